//! Fixed-arity points and validated colors.
//!
//! Points support component-wise arithmetic against another point of the same
//! arity or against a scalar. Slice-based variants check the arity at runtime
//! and fail with [`GenerateError::ShapeMismatch`].

use crate::error::GenerateError;

macro_rules! point_op {
    ($t:ident, $trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt, $($f:ident),+) => {
        impl std::ops::$trait for $t {
            type Output = $t;

            #[inline]
            fn $method(self, rhs: $t) -> $t {
                $t { $($f: self.$f $op rhs.$f),+ }
            }
        }

        impl std::ops::$trait<f64> for $t {
            type Output = $t;

            #[inline]
            fn $method(self, rhs: f64) -> $t {
                $t { $($f: self.$f $op rhs),+ }
            }
        }

        impl std::ops::$assign_trait for $t {
            #[inline]
            fn $assign_method(&mut self, rhs: $t) {
                *self = *self $op rhs;
            }
        }
    };
}

macro_rules! point_type {
    ($(#[$meta:meta])* $t:ident, $n:literal, $($f:ident),+) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default)]
        pub struct $t {
            $(pub $f: f64),+
        }

        impl $t {
            /// Number of components.
            pub const ARITY: usize = $n;

            /// Creates a point from its components.
            pub const fn new($($f: f64),+) -> Self {
                Self { $($f),+ }
            }

            /// Creates a point with every component set to `value`.
            pub const fn splat(value: f64) -> Self {
                Self { $($f: value),+ }
            }

            /// Creates a point from a slice, which must have exactly
            /// [`Self::ARITY`] values.
            pub fn from_slice(values: &[f64]) -> Result<Self, GenerateError> {
                if values.len() != $n {
                    return Err(GenerateError::ShapeMismatch {
                        expected: $n,
                        found: values.len(),
                    });
                }
                let mut it = values.iter().copied();
                Ok(Self { $($f: it.next().unwrap_or_default()),+ })
            }

            pub fn try_add_slice(self, rhs: &[f64]) -> Result<Self, GenerateError> {
                Ok(self + Self::from_slice(rhs)?)
            }

            pub fn try_mul_slice(self, rhs: &[f64]) -> Result<Self, GenerateError> {
                Ok(self * Self::from_slice(rhs)?)
            }

            /// Dot product.
            #[inline]
            pub fn dot(self, other: Self) -> f64 {
                0.0 $(+ self.$f * other.$f)+
            }

            /// Euclidean length.
            #[inline]
            pub fn length(self) -> f64 {
                self.dot(self).sqrt()
            }

            /// Euclidean distance to `other`.
            #[inline]
            pub fn distance(self, other: Self) -> f64 {
                (self - other).length()
            }

            /// Component-wise absolute value.
            pub fn abs(self) -> Self {
                Self { $($f: self.$f.abs()),+ }
            }

            /// Component-wise rounding, half away from zero.
            pub fn round(self) -> Self {
                Self { $($f: self.$f.round()),+ }
            }
        }

        impl std::ops::Neg for $t {
            type Output = $t;

            fn neg(self) -> $t {
                $t { $($f: -self.$f),+ }
            }
        }

        impl From<[f64; $n]> for $t {
            fn from(values: [f64; $n]) -> Self {
                let [$($f),+] = values;
                Self { $($f),+ }
            }
        }

        point_op!($t, Add, add, AddAssign, add_assign, +, $($f),+);
        point_op!($t, Sub, sub, SubAssign, sub_assign, -, $($f),+);
        point_op!($t, Mul, mul, MulAssign, mul_assign, *, $($f),+);
        point_op!($t, Div, div, DivAssign, div_assign, /, $($f),+);
        point_op!($t, Rem, rem, RemAssign, rem_assign, %, $($f),+);
    };
}

point_type!(
    /// A 2D point or vector.
    Point2, 2, x, y
);

point_type!(
    /// A 3D point; `z` carries height.
    Point3, 3, x, y, z
);

point_type!(
    /// A 4-component tuple, used for rectangles as `(x, y, width, height)`.
    Point4, 4, x, y, z, w
);

impl Point2 {
    /// Extends to 3D with the given `z`.
    pub fn with_z(self, z: f64) -> Point3 {
        Point3::new(self.x, self.y, z)
    }

    /// 2D cross product (z of the 3D cross product).
    #[inline]
    pub fn cross(self, other: Point2) -> f64 {
        self.x * other.y - self.y * other.x
    }
}

impl Point3 {
    #[inline]
    pub fn xy(self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Returns a copy with `z` replaced.
    pub fn with_z(self, z: f64) -> Point3 {
        Point3::new(self.x, self.y, z)
    }
}

impl Point4 {
    pub fn xy(self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    pub fn zw(self) -> Point2 {
        Point2::new(self.z, self.w)
    }
}

/// A single color component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorComponent {
    /// 8-bit style integer value; values above 255 saturate on output.
    Int(u32),
    /// Unit-range float in [0, 1].
    Unit(f64),
}

impl ColorComponent {
    /// Converts to an 8-bit channel value.
    pub fn to_u8(self) -> u8 {
        match self {
            ColorComponent::Int(v) => v.min(255) as u8,
            ColorComponent::Unit(v) => (v * 255.0).round().clamp(0.0, 255.0) as u8,
        }
    }

    /// Converts to a unit-range value.
    pub fn to_unit(self) -> f64 {
        match self {
            ColorComponent::Int(v) => v.min(255) as f64 / 255.0,
            ColorComponent::Unit(v) => v,
        }
    }
}

/// Unvalidated input for a color component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorValue {
    Int(i64),
    Float(f64),
}

impl From<i64> for ColorValue {
    fn from(v: i64) -> Self {
        ColorValue::Int(v)
    }
}

impl From<i32> for ColorValue {
    fn from(v: i32) -> Self {
        ColorValue::Int(v as i64)
    }
}

impl From<u8> for ColorValue {
    fn from(v: u8) -> Self {
        ColorValue::Int(v as i64)
    }
}

impl From<f64> for ColorValue {
    fn from(v: f64) -> Self {
        ColorValue::Float(v)
    }
}

impl TryFrom<ColorValue> for ColorComponent {
    type Error = GenerateError;

    fn try_from(value: ColorValue) -> Result<Self, Self::Error> {
        match value {
            ColorValue::Int(v) if v < 0 => Err(GenerateError::InvalidColorValue(format!(
                "integer component must be non-negative, got {}",
                v
            ))),
            ColorValue::Int(v) => Ok(ColorComponent::Int(v.min(u32::MAX as i64) as u32)),
            ColorValue::Float(v) if !(0.0..=1.0).contains(&v) => {
                Err(GenerateError::InvalidColorValue(format!(
                    "float component must be in [0, 1], got {}",
                    v
                )))
            }
            ColorValue::Float(v) => Ok(ColorComponent::Unit(v)),
        }
    }
}

/// An RGB color whose components were validated at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRgb {
    pub r: ColorComponent,
    pub g: ColorComponent,
    pub b: ColorComponent,
}

impl ColorRgb {
    /// Creates a color, failing with [`GenerateError::InvalidColorValue`]
    /// for a negative integer or a float outside [0, 1].
    pub fn new(
        r: impl Into<ColorValue>,
        g: impl Into<ColorValue>,
        b: impl Into<ColorValue>,
    ) -> Result<Self, GenerateError> {
        Ok(Self {
            r: r.into().try_into()?,
            g: g.into().try_into()?,
            b: b.into().try_into()?,
        })
    }

    /// Creates a color from 8-bit channels.
    pub fn from_rgb8(rgb: [u8; 3]) -> Self {
        Self {
            r: ColorComponent::Int(rgb[0] as u32),
            g: ColorComponent::Int(rgb[1] as u32),
            b: ColorComponent::Int(rgb[2] as u32),
        }
    }

    pub fn white() -> Self {
        Self::from_rgb8([255, 255, 255])
    }

    pub fn black() -> Self {
        Self::from_rgb8([0, 0, 0])
    }

    /// Converts to 8-bit channels.
    pub fn to_rgb8(&self) -> [u8; 3] {
        [self.r.to_u8(), self.g.to_u8(), self.b.to_u8()]
    }

    /// Converts to unit-range channels.
    pub fn to_unit(&self) -> [f64; 3] {
        [self.r.to_unit(), self.g.to_unit(), self.b.to_unit()]
    }

    /// CSS hex notation, e.g. `#ff8000`.
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// Interpolates towards `other` by `t` in [0, 1], on 8-bit channels.
    pub fn lerp(&self, other: &ColorRgb, t: f64) -> ColorRgb {
        let t = t.clamp(0.0, 1.0);
        let a = self.to_rgb8();
        let b = other.to_rgb8();
        let mix = |i: usize| (a[i] as f64 + (b[i] as f64 - a[i] as f64) * t).round() as u8;
        ColorRgb::from_rgb8([mix(0), mix(1), mix(2)])
    }

    /// Converts to hue, lightness, saturation, each in [0, 1].
    pub fn to_hls(&self) -> (f64, f64, f64) {
        let [r, g, b] = self.to_unit();
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (min + max) / 2.0;
        if max == min {
            return (0.0, l, 0.0);
        }
        let delta = max - min;
        let s = if l <= 0.5 {
            delta / (max + min)
        } else {
            delta / (2.0 - max - min)
        };
        let rc = (max - r) / delta;
        let gc = (max - g) / delta;
        let bc = (max - b) / delta;
        let h = if r == max {
            bc - gc
        } else if g == max {
            2.0 + rc - bc
        } else {
            4.0 + gc - rc
        };
        ((h / 6.0).rem_euclid(1.0), l, s)
    }

    /// Creates a color from hue, lightness, saturation, each in [0, 1].
    pub fn from_hls(h: f64, l: f64, s: f64) -> Self {
        let unit = |v: f64| ColorComponent::Unit(v.clamp(0.0, 1.0));
        if s == 0.0 {
            return Self {
                r: unit(l),
                g: unit(l),
                b: unit(l),
            };
        }
        let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let m1 = 2.0 * l - m2;
        Self {
            r: unit(hue_channel(m1, m2, h + 1.0 / 3.0)),
            g: unit(hue_channel(m1, m2, h)),
            b: unit(hue_channel(m1, m2, h - 1.0 / 3.0)),
        }
    }
}

fn hue_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}
