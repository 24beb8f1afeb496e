//! Reading points from whitespace-separated text files.

use std::path::Path;

/// Reads one point per line from the file at `path`.
///
/// Blank lines and lines starting with `#` are skipped.
pub fn read_points<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<f64>>, String> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| format!("Could not read {}: {e}", path.display()))?;
    parse_points(&contents).map_err(|e| format!("{}: {e}", path.display()))
}

/// Parses one point per line of `contents`, checking that every point has
/// the same dimension.
pub fn parse_points(contents: &str) -> Result<Vec<Vec<f64>>, String> {
    let mut points: Vec<Vec<f64>> = Vec::new();

    for (i, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let point = line
            .split_whitespace()
            .map(|c| c.parse::<f64>().map_err(|e| format!("line {}: {e} in {c:?}", i + 1)))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(first) = points.first() {
            if first.len() != point.len() {
                return Err(format!(
                    "line {}: expected {} coordinates but found {}",
                    i + 1,
                    first.len(),
                    point.len()
                ));
            }
        }
        points.push(point);
    }

    Ok(points)
}
