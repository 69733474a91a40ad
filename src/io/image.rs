//! PNG export of simulated grids, one pixel per cell

use std::path::Path;

use image::{ImageBuffer, Rgba};
use ndarray::Array2;

use crate::io::error::{RisqError, Result};
use crate::model::State;

/// Export a grid of states as a PNG image in the given state colors
///
/// # Errors
///
/// Returns an error if:
/// - The grid is empty
/// - A state has no color in `colors`
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_grid_as_png(grid: &Array2<State>, colors: &[[u8; 4]], output_path: &Path) -> Result<()> {
    let (height, width) = grid.dim();
    if height == 0 || width == 0 {
        return Err(RisqError::InvalidParameter {
            parameter: "grid",
            value: format!("{height}x{width}"),
            reason: "Cannot export an empty grid".to_string(),
        });
    }

    let mut img = ImageBuffer::new(width as u32, height as u32);

    for ((row, col), &state) in grid.indexed_iter() {
        let rgba = colors.get(state).copied().ok_or(RisqError::InvalidState {
            state,
            num_states: colors.len(),
        })?;
        img.put_pixel(col as u32, row as u32, Rgba(rgba));
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| RisqError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }
    }

    img.save(output_path)
        .map_err(|e| RisqError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}
