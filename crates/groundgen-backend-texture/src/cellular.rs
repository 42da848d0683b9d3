//! Cellular stone pipeline: lattice, Voronoi cells, post-processing, and the
//! depth / defects / texture documents.
//!
//! Every random stage draws from its own RNG derived from the request seed,
//! so enabling one stage does not reshuffle the others.

use groundgen_spec::CellularParams;
use tracing::{debug, instrument};

use crate::cells::{apply_random_texture, remove_random_cells, slant_random, Cell};
use crate::error::GenerateError;
use crate::lattice::{build_lattice, displace_z, distort, wrap};
use crate::offset::{offset, JoinType};
use crate::point::{ColorRgb, Point2};
use crate::raster::{rasterize_svg, RgbBuffer};
use crate::rng::DeterministicRng;
use crate::svg::{compose, Background, SvgDocument, SvgOptions};
use crate::voronoi::build_cells;

/// Lattice units per grid cell.
pub const SCALE: f64 = 1000.0;

/// Cell sets feeding the three documents.
#[derive(Debug, Clone)]
pub struct CellLayers {
    /// Remaining cells, offset and slanted, for the depth image.
    pub cells: Vec<Cell>,
    /// Removed cells, flattened to z = 0, for the defects mask.
    pub defect_cells: Vec<Cell>,
    /// Cells with texture or color assignments, for the texture image.
    pub texture_cells: Vec<Cell>,
}

/// The depth, defects, and texture documents of one sample.
#[derive(Debug, Clone)]
pub struct CellularDocuments {
    pub depth: SvgDocument,
    pub defects: SvgDocument,
    pub texture: SvgDocument,
}

/// Rasterized images of one sample, with the documents they came from.
#[derive(Debug, Clone)]
pub struct CellularImages {
    pub texture: RgbBuffer,
    pub defects: RgbBuffer,
    pub depth: RgbBuffer,
    pub documents: CellularDocuments,
}

/// Builds the cell layers of a sample.
pub fn build_layers(params: &CellularParams, seed: u32) -> Result<CellLayers, GenerateError> {
    let grid = [params.size, params.size];
    if params.size == 0 {
        return Err(GenerateError::InvalidParameter(
            "grid size must be at least 1".to_string(),
        ));
    }
    if params.wrap_amount > params.size {
        return Err(GenerateError::WrapTooLarge {
            amount: params.wrap_amount,
            size: params.size,
        });
    }

    let mut lattice = build_lattice(grid, SCALE);
    distort(
        &mut lattice,
        params.grid_distortion * SCALE,
        &mut DeterministicRng::for_stage(seed, "distort"),
    );
    if params.max_z_displace > 0.0 {
        displace_z(
            &mut lattice,
            params.max_z_displace,
            &mut DeterministicRng::for_stage(seed, "displace_z"),
        );
    }
    if params.wrap_amount > 0 {
        wrap(&mut lattice, grid, params.wrap_amount, SCALE)?;
    }
    debug!(sites = lattice.len(), "built lattice");

    let mut cells = build_cells(&lattice);

    let defect_cells = if params.defects > 0 {
        let mut removed = remove_random_cells(
            &mut cells,
            params.defects,
            grid,
            params.wrap_amount,
            SCALE,
            &mut DeterministicRng::for_stage(seed, "defects"),
        );
        offset(&mut removed, -params.distance * 0.5 * SCALE, JoinType::Miter);
        removed
    } else {
        Vec::new()
    };
    debug!(
        requested = params.defects,
        removed = defect_cells.len(),
        "removed defect cells"
    );

    let mut texture_cells = apply_random_texture(
        &cells,
        &params.texture_images,
        grid,
        SCALE,
        &mut DeterministicRng::for_stage(seed, "texture"),
    )
    .unwrap_or_else(|| {
        let foreground = ColorRgb::from_rgb8(params.foreground);
        cells
            .iter()
            .cloned()
            .map(|mut cell| {
                cell.color = Some(foreground);
                cell
            })
            .collect()
    });

    shape_stones(&mut texture_cells, params);
    shape_stones(&mut cells, params);
    if params.max_slant > 0.0 {
        slant_random(
            &mut cells,
            params.max_slant,
            params.max_z_displace,
            &mut DeterministicRng::for_stage(seed, "slant"),
        );
    }
    debug!(cells = cells.len(), "shaped cells");

    Ok(CellLayers {
        cells,
        defect_cells,
        texture_cells,
    })
}

/// Opens the gaps between cells and cuts their corners.
fn shape_stones(cells: &mut [Cell], params: &CellularParams) {
    offset(
        cells,
        -(params.distance + params.corner_size) * 0.5 * SCALE,
        JoinType::Miter,
    );
    if params.corner_size != 0.0 {
        offset(cells, params.corner_size * 0.5 * SCALE, JoinType::Square);
    }
}

/// Composes the depth, defects, and texture documents.
pub fn render(
    layers: &CellLayers,
    params: &CellularParams,
) -> Result<CellularDocuments, GenerateError> {
    let background_color = ColorRgb::from_rgb8(params.background);
    let options = SvgOptions {
        size: [params.size, params.size],
        scale: SCALE,
        offset: Point2::splat((params.wrap_amount / 2) as f64 * SCALE),
        dpi: params.dpi,
        foreground: ColorRgb::from_rgb8(params.foreground),
        background_color,
        background: Background::Color(background_color),
        render_center: params.debug_cell_center,
        crisp_edges: false,
    };

    let depth = compose(&layers.cells, &options)?;
    let defects = compose(
        &layers.defect_cells,
        &SvgOptions {
            crisp_edges: true,
            ..options.clone()
        },
    )?;
    let texture_background = match &params.background_texture {
        Some(file) => Background::Texture(file.clone()),
        None => Background::Color(background_color),
    };
    let texture = compose(
        &layers.texture_cells,
        &SvgOptions {
            background: texture_background,
            ..options
        },
    )?;
    debug!(
        width = depth.width,
        height = depth.height,
        depth_bytes = depth.text.len(),
        texture_bytes = texture.text.len(),
        "composed documents"
    );

    Ok(CellularDocuments {
        depth,
        defects,
        texture,
    })
}

/// Generates a cellular stone sample.
#[instrument(skip(params), fields(size = params.size, defects = params.defects))]
pub fn generate_cellular(
    params: &CellularParams,
    seed: u32,
) -> Result<CellularImages, GenerateError> {
    let layers = build_layers(params, seed)?;
    let documents = render(&layers, params)?;
    Ok(CellularImages {
        texture: rasterize_svg(&documents.texture)?,
        defects: rasterize_svg(&documents.defects)?,
        depth: rasterize_svg(&documents.depth)?,
        documents,
    })
}
