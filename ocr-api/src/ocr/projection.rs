use super::engine::OcrOutput;

/// Flattens engine output into the recognized strings of the first page.
///
/// Geometry and confidence are dropped. Malformed entries are skipped, and a
/// missing first page yields an empty list.
pub fn project_text(output: &OcrOutput) -> Vec<String> {
    let Some(Some(lines)) = output.pages.first() else {
        return Vec::new();
    };

    lines
        .iter()
        .flatten()
        .map(|line| line.text.clone())
        .collect()
}
