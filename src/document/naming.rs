//! File-name conventions and the fixed labels printed into documents.

pub const QUESTIONS_TITLE_SUFFIX: &str = "Sorular";
pub const SOLUTIONS_TITLE_SUFFIX: &str = "Çözümler";
pub const SECTION_PREFIX: &str = "Soru";
pub const SOLUTION_STEPS_HEADING: &str = "Çözüm Adımları:";
pub const ANSWER_PREFIX: &str = "Doğru Cevap:";

pub fn questions_file_name(run_id: &str) -> String {
    format!("sorular_{run_id}.docx")
}

pub fn solutions_file_name(run_id: &str) -> String {
    format!("cozumler_{run_id}.docx")
}

/// Downloadable figure for the `index`-th (1-based) question of a run.
pub fn image_file_name(run_id: &str, index: usize) -> String {
    format!("gorsel_{run_id}_{index}.svg")
}

pub fn section_heading(index: usize) -> String {
    format!("{SECTION_PREFIX} {index}")
}

/// Letter label for the option at `idx`: A, B, C, ... and plain numbers past Z.
pub fn option_label(idx: usize) -> String {
    if idx < 26 {
        char::from(b'A' + idx as u8).to_string()
    } else {
        (idx + 1).to_string()
    }
}

/// True when `name` is a bare file name that cannot escape its directory.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && sanitize_filename::sanitize(name) == name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names_follow_convention() {
        assert_eq!(questions_file_name("ab12cd34"), "sorular_ab12cd34.docx");
        assert_eq!(solutions_file_name("ab12cd34"), "cozumler_ab12cd34.docx");
        assert_eq!(image_file_name("ab12cd34", 3), "gorsel_ab12cd34_3.svg");
    }

    #[test]
    fn test_option_labels() {
        assert_eq!(option_label(0), "A");
        assert_eq!(option_label(4), "E");
        assert_eq!(option_label(25), "Z");
        assert_eq!(option_label(26), "27");
    }

    #[test]
    fn test_plain_file_name() {
        assert!(is_plain_file_name("sorular_ab12cd34.docx"));
        assert!(!is_plain_file_name("../history.json"));
        assert!(!is_plain_file_name("nested/file.docx"));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name(""));
    }
}
