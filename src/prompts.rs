pub const DESCRIBE_IMAGE: &str = include_str!("../data/prompts/describe_image.txt");

const REFINEMENT_HEADER: &str = "**Additional instruction:**";

/// Append the user's follow-up question to a base instruction.
///
/// A missing or blank refinement leaves the base prompt untouched.
pub fn compose_prompt(base: &str, refinement: Option<&str>) -> String {
    let base = base.trim_end();
    match refinement.map(str::trim).filter(|r| !r.is_empty()) {
        Some(refinement) => format!("{}\n\n{} {}", base, REFINEMENT_HEADER, refinement),
        None => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_without_refinement() {
        assert_eq!(compose_prompt("Describe it.", None), "Describe it.");
    }

    #[test]
    fn test_compose_with_refinement() {
        assert_eq!(
            compose_prompt("Describe it.", Some("Focus on the architecture")),
            "Describe it.\n\n**Additional instruction:** Focus on the architecture"
        );
    }

    #[test]
    fn test_blank_refinement_is_ignored() {
        assert_eq!(compose_prompt("Describe it.", Some("   \n")), "Describe it.");
    }

    #[test]
    fn test_trailing_newline_of_template_is_dropped() {
        assert_eq!(compose_prompt("Describe it.\n", None), "Describe it.");
    }

    #[test]
    fn test_describe_prompt_is_non_empty() {
        assert!(!DESCRIBE_IMAGE.trim().is_empty());
    }
}
