use revbot_ghapi_interface::types::GhPullRequestFile;

/// Builds a textual diff from changed files, one header per file
/// followed by its patch. Files without a patch (binaries, renames)
/// keep the header so the model still sees them.
pub fn build_diff(files: &[GhPullRequestFile]) -> String {
    let mut diff = String::new();

    for file in files {
        diff.push_str(&format!("File: {} ({})\n", file.filename, file.status));
        if let Some(patch) = &file.patch {
            diff.push_str(patch);
            diff.push('\n');
        }
        diff.push('\n');
    }

    diff
}
