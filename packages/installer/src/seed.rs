//! Idempotent merging of seed templates into the shared seed artifact.
//!
//! All of a feature's seed templates are concatenated into one block,
//! delimited by begin/end marker comments carrying the feature id. The
//! presence of the begin marker is what makes repeated installs a no-op:
//! the installer checks [`contains_block`] before appending.

/// Marker line opening a feature's merged block.
pub fn begin_marker(feature_id: &str) -> String {
    format!("-- stackkit:begin {}", feature_id)
}

/// Marker line closing a feature's merged block.
pub fn end_marker(feature_id: &str) -> String {
    format!("-- stackkit:end {}", feature_id)
}

/// Marker line naming the template a chunk of seed content came from.
pub fn source_marker(file_name: &str) -> String {
    format!("-- stackkit:source {}", file_name)
}

/// Whether the shared artifact already holds a block for the feature.
pub fn contains_block(seed: &str, feature_id: &str) -> bool {
    let marker = begin_marker(feature_id);
    seed.lines().any(|line| line.trim() == marker)
}

/// Normalize content to end with exactly one trailing line break.
fn normalize(content: &str) -> String {
    format!("{}\n", content.trim_end_matches('\n'))
}

/// Build a feature's block from `(template file name, content)` pairs.
pub fn build_block(feature_id: &str, sources: &[(String, String)]) -> String {
    let mut block = String::new();
    block.push_str(&begin_marker(feature_id));
    block.push('\n');
    for (name, content) in sources {
        block.push_str(&source_marker(name));
        block.push('\n');
        block.push_str(&normalize(content));
    }
    block.push_str(&end_marker(feature_id));
    block.push('\n');
    block
}

/// Append a block to the existing artifact content.
pub fn append_block(existing: &str, block: &str) -> String {
    if existing.trim().is_empty() {
        block.to_string()
    } else {
        format!("{}{}", normalize(existing), block)
    }
}
