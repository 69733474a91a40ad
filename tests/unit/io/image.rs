//! Tests for PNG export of simulated grids

#[cfg(test)]
mod tests {
    use ndarray::{Array2, array};
    use risq::RisqError;
    use risq::io::image::export_grid_as_png;

    const COLORS: [[u8; 4]; 2] = [[46, 139, 87, 255], [178, 34, 34, 255]];

    // Tests PNG file creation with one pixel per cell
    // Verified by reading back the image dimensions and a pixel
    #[test]
    fn test_export_grid_as_png_creates_file() {
        let Ok(dir) = tempfile::tempdir() else {
            unreachable!("temporary directory should be available");
        };
        let output_path = dir.path().join("nested").join("grid.png");
        let grid = array![[0, 1, 0], [1, 1, 0]];

        let result = export_grid_as_png(&grid, &COLORS, &output_path);
        assert!(result.is_ok(), "PNG export should succeed");
        assert!(output_path.exists(), "PNG file should be created");

        let Ok(img) = image::open(&output_path) else {
            unreachable!("exported file should be a readable image");
        };
        let img = img.to_rgba8();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(1, 0).0, [178, 34, 34, 255]);
        assert_eq!(img.get_pixel(2, 1).0, [46, 139, 87, 255]);
    }

    // Tests error for an empty grid
    // Verified by ignoring empty grid check
    #[test]
    fn test_export_empty_grid_error() {
        let Ok(dir) = tempfile::tempdir() else {
            unreachable!("temporary directory should be available");
        };
        let grid: Array2<usize> = Array2::zeros((0, 4));

        let result = export_grid_as_png(&grid, &COLORS, &dir.path().join("empty.png"));
        assert!(matches!(
            result,
            Err(RisqError::InvalidParameter {
                parameter: "grid",
                ..
            })
        ));
    }

    // Tests error for states without a color
    // Verified by exporting state 2 with two colors
    #[test]
    fn test_export_missing_color_error() {
        let Ok(dir) = tempfile::tempdir() else {
            unreachable!("temporary directory should be available");
        };
        let grid = array![[0, 2]];

        let result = export_grid_as_png(&grid, &COLORS, &dir.path().join("missing.png"));
        assert!(matches!(
            result,
            Err(RisqError::InvalidState {
                state: 2,
                num_states: 2
            })
        ));
    }
}
