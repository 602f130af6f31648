//! Language table shared by the detector, the CLI and request validation.

use crate::config::Lang;

/// A language option for selection lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageOption {
    /// Language code (e.g., "en", "fr", "zh-cn")
    pub code: &'static str,
    /// Display name (e.g., "English", "French")
    pub name: &'static str,
}

const fn lang(code: &'static str, name: &'static str) -> LanguageOption {
    LanguageOption { code, name }
}

/// The `auto` entry offered as a source language.
pub const AUTO_DETECT: LanguageOption = lang(Lang::AUTO, "Auto Detect");

/// Every concrete language the translation and speech services are offered for.
pub const LANGUAGES: &[LanguageOption] = &[
    lang("af", "Afrikaans"),
    lang("sq", "Albanian"),
    lang("am", "Amharic"),
    lang("ar", "Arabic"),
    lang("hy", "Armenian"),
    lang("az", "Azerbaijani"),
    lang("eu", "Basque"),
    lang("be", "Belarusian"),
    lang("bn", "Bengali"),
    lang("bs", "Bosnian"),
    lang("bg", "Bulgarian"),
    lang("ca", "Catalan"),
    lang("ceb", "Cebuano"),
    lang("ny", "Chichewa"),
    lang("zh-cn", "Chinese (Simplified)"),
    lang("zh-tw", "Chinese (Traditional)"),
    lang("co", "Corsican"),
    lang("hr", "Croatian"),
    lang("cs", "Czech"),
    lang("da", "Danish"),
    lang("nl", "Dutch"),
    lang("en", "English"),
    lang("eo", "Esperanto"),
    lang("et", "Estonian"),
    lang("tl", "Filipino"),
    lang("fi", "Finnish"),
    lang("fr", "French"),
    lang("fy", "Frisian"),
    lang("gl", "Galician"),
    lang("ka", "Georgian"),
    lang("de", "German"),
    lang("el", "Greek"),
    lang("gu", "Gujarati"),
    lang("ht", "Haitian Creole"),
    lang("ha", "Hausa"),
    lang("haw", "Hawaiian"),
    lang("iw", "Hebrew"),
    lang("hi", "Hindi"),
    lang("hmn", "Hmong"),
    lang("hu", "Hungarian"),
    lang("is", "Icelandic"),
    lang("ig", "Igbo"),
    lang("id", "Indonesian"),
    lang("ga", "Irish"),
    lang("it", "Italian"),
    lang("ja", "Japanese"),
    lang("jw", "Javanese"),
    lang("kn", "Kannada"),
    lang("kk", "Kazakh"),
    lang("km", "Khmer"),
    lang("ko", "Korean"),
    lang("ku", "Kurdish (Kurmanji)"),
    lang("ky", "Kyrgyz"),
    lang("lo", "Lao"),
    lang("la", "Latin"),
    lang("lv", "Latvian"),
    lang("lt", "Lithuanian"),
    lang("lb", "Luxembourgish"),
    lang("mk", "Macedonian"),
    lang("mg", "Malagasy"),
    lang("ms", "Malay"),
    lang("ml", "Malayalam"),
    lang("mt", "Maltese"),
    lang("mi", "Maori"),
    lang("mr", "Marathi"),
    lang("mn", "Mongolian"),
    lang("my", "Myanmar (Burmese)"),
    lang("ne", "Nepali"),
    lang("no", "Norwegian"),
    lang("or", "Odia"),
    lang("ps", "Pashto"),
    lang("fa", "Persian"),
    lang("pl", "Polish"),
    lang("pt", "Portuguese"),
    lang("pa", "Punjabi"),
    lang("ro", "Romanian"),
    lang("ru", "Russian"),
    lang("sm", "Samoan"),
    lang("gd", "Scots Gaelic"),
    lang("sr", "Serbian"),
    lang("st", "Sesotho"),
    lang("sn", "Shona"),
    lang("sd", "Sindhi"),
    lang("si", "Sinhala"),
    lang("sk", "Slovak"),
    lang("sl", "Slovenian"),
    lang("so", "Somali"),
    lang("es", "Spanish"),
    lang("su", "Sundanese"),
    lang("sw", "Swahili"),
    lang("sv", "Swedish"),
    lang("tg", "Tajik"),
    lang("ta", "Tamil"),
    lang("te", "Telugu"),
    lang("th", "Thai"),
    lang("tr", "Turkish"),
    lang("uk", "Ukrainian"),
    lang("ur", "Urdu"),
    lang("ug", "Uyghur"),
    lang("uz", "Uzbek"),
    lang("vi", "Vietnamese"),
    lang("cy", "Welsh"),
    lang("xh", "Xhosa"),
    lang("yi", "Yiddish"),
    lang("yo", "Yoruba"),
    lang("zu", "Zulu"),
];

/// Languages available as translation source, `auto` first.
pub fn source_languages() -> Vec<LanguageOption> {
    std::iter::once(AUTO_DETECT)
        .chain(LANGUAGES.iter().copied())
        .collect()
}

/// Languages available as translation target.
pub fn target_languages() -> Vec<LanguageOption> {
    LANGUAGES.to_vec()
}

/// Display name for a language code, `None` for unknown codes.
pub fn language_name(code: &str) -> Option<&'static str> {
    if code == Lang::AUTO {
        return Some(AUTO_DETECT.name);
    }
    LANGUAGES
        .iter()
        .find(|option| option.code == code)
        .map(|option| option.name)
}

/// Whether a code names a concrete language in the table.
pub fn is_known(code: &str) -> bool {
    LANGUAGES.iter().any(|option| option.code == code)
}

/// Resolve user input (a code or a display name, any case) to a language.
///
/// `auto` is accepted and returned as-is.
pub fn lookup(input: &str) -> Option<Lang> {
    let input = input.trim();
    if input.eq_ignore_ascii_case(Lang::AUTO) || input.eq_ignore_ascii_case(AUTO_DETECT.name) {
        return Some(Lang::auto());
    }
    LANGUAGES
        .iter()
        .find(|option| {
            option.code.eq_ignore_ascii_case(input) || option.name.eq_ignore_ascii_case(input)
        })
        .map(|option| Lang::new(option.code))
}

/// Spelling used by the Google web endpoints, which want an uppercase region.
pub(crate) fn google_code(lang: &Lang) -> String {
    match lang.as_str() {
        "zh-cn" => "zh-CN".to_string(),
        "zh-tw" => "zh-TW".to_string(),
        code => code.to_string(),
    }
}
