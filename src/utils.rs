use chrono::Utc;
use once_cell::sync::OnceCell;
use regex::Regex;

/// Clean a raw narrative report for display: `<br>` variants become
/// newlines, remaining tags are stripped, HTML entities are unescaped.
///
/// The pollers always deliver narrative text raw; this is an opt-in
/// convenience for consumers.
pub fn clean_narrative(raw: &str) -> String {
    static RE_BR: OnceCell<Regex> = OnceCell::new();
    let re_br = RE_BR.get_or_init(|| Regex::new(r"(?i)<br\s*/?>").unwrap());

    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?s)<[^>]*>").unwrap());

    let lined = re_br.replace_all(raw, "\n");
    let stripped = re_tags.replace_all(&lined, "");
    html_escape::decode_html_entities(stripped.as_ref()).into_owned()
}

/// Cache-buster value for the alert and realtime endpoints.
pub fn unix_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn br_tags_become_newlines() {
        assert_eq!(clean_narrative("satu<br>dua<BR/>tiga<br />empat"), "satu\ndua\ntiga\nempat");
    }

    #[test]
    fn tags_are_stripped_and_entities_unescaped() {
        let raw = "<p>Gempabumi <b>M5,6</b> &ndash; tidak berpotensi tsunami</p>";
        assert_eq!(
            clean_narrative(raw),
            "Gempabumi M5,6 \u{2013} tidak berpotensi tsunami"
        );
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(clean_narrative("sudah bersih"), "sudah bersih");
    }
}
