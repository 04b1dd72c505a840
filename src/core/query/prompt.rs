//! Fixed prompt templates

pub fn search_prompt(selected_text: &str) -> String {
    format!(
        "\nPlease analyze and provide detailed information about: \"{}\"\n\
         \n\
         Your response should:\n\
         1. Provide comprehensive context and explanation\n\
         2. Include relevant facts and details\n\
         3. Cite sources when possible\n\
         4. Use clear, concise language\n\
         5. Format with markdown for readability\n",
        selected_text
    )
}

pub fn translate_prompt(selected_text: &str, target_lang: &str) -> String {
    format!(
        "\nTranslate the following text into the language with ISO 639-1 code \"{}\": \"{}\"\n\
         \n\
         Reply with the translation only, formatted with markdown where the source uses structure.\n",
        target_lang, selected_text
    )
}

pub fn summarize_prompt(selected_text: &str) -> String {
    format!(
        "\nSummarize the following text: \"{}\"\n\
         \n\
         Your response should:\n\
         1. Capture the key points in a few sentences\n\
         2. Keep the original meaning\n\
         3. Format with markdown for readability\n",
        selected_text
    )
}

pub fn explain_prompt(selected_text: &str) -> String {
    format!(
        "\nExplain the following text in simple terms: \"{}\"\n\
         \n\
         Your response should:\n\
         1. Define any jargon or technical terms\n\
         2. Give a short example where it helps\n\
         3. Format with markdown for readability\n",
        selected_text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_prompt_exact() {
        let expected = "
Please analyze and provide detailed information about: \"photosynthesis\"

Your response should:
1. Provide comprehensive context and explanation
2. Include relevant facts and details
3. Cite sources when possible
4. Use clear, concise language
5. Format with markdown for readability
";
        assert_eq!(search_prompt("photosynthesis"), expected);
    }

    #[test]
    fn test_selection_embedded_verbatim() {
        let text = "  \"quoted\" & <tagged>  ";
        assert!(search_prompt(text).contains(&format!("\"{}\"", text)));
        assert!(translate_prompt(text, "fr").contains("\"fr\""));
        assert!(summarize_prompt(text).contains(text));
        assert!(explain_prompt(text).contains(text));
    }
}
