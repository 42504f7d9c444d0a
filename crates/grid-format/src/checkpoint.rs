use std::path::{Path, PathBuf};

/// `"{stem}_step_{step}.json"`
pub fn checkpoint_file_name(stem: &str, step: usize) -> String {
    format!("{stem}_step_{step}.json")
}

pub fn checkpoint_path(directory: &Path, stem: &str, step: usize) -> PathBuf {
    directory.join(checkpoint_file_name(stem, step))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_numbered_names() {
        assert_eq!(
            checkpoint_file_name("crack_generator", 3),
            "crack_generator_step_3.json"
        );
        assert_eq!(
            checkpoint_path(Path::new("out"), "bridging_domain", 12),
            Path::new("out").join("bridging_domain_step_12.json")
        );
    }
}
