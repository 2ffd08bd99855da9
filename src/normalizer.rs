//! Title cleaning: turns a raw scraped title into a canonical display title.
//!
//! The steps run in a fixed order and the whole pipeline is idempotent, so a
//! title that was already refined passes through unchanged.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static MARKUP_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

// 「…」 spans carry seller slogans, never vehicle facts. An unclosed 「 eats
// the rest of the string, matching how these titles are truncated upstream.
static QUOTED_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"「[^」]*」?").unwrap());

// Portal badge tags: featured / distributor / private sale / real price /
// certified and the HOT/SAVE/SUM banners, brackets included.
static NOISE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[【\[《『](?:置頂|總代理|自售|實車實價|認證|HOT|SAVE|SUM)[】\]》』]?").unwrap()
});

// Everything from the first trailing-noise marker onward is list-page clutter:
// distance-to-you suffix, duplicated price/year tags, loan marketing.
static TRAILING_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)(?:距離您|\d+\.?\d*萬|20\d{2}年|\d+歲即可貸|低利率|強力過件|信用小白|全額貸).*")
        .unwrap()
});

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Cleans a raw listing title. Blank input yields an empty string. Case is
/// preserved; matching against brand patterns is the identifier's concern.
pub fn refine_title(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    // NFKC first, so full-width bracket and digit variants (［自售］, ２０２１年)
    // cannot slip a marker past the removal passes. The removal passes only
    // delete text or insert ASCII spaces, so the output stays normalized and
    // a second run finds nothing left to fold or remove.
    let folded: String = raw.nfkc().collect();

    let text = MARKUP_TAG.replace_all(&folded, " ");
    let text = QUOTED_SPAN.replace_all(&text, " ");
    let text = NOISE_TAG.replace_all(&text, " ");
    let text = TRAILING_NOISE.replace(&text, "");

    WHITESPACE_RUN.replace_all(&text, " ").trim().to_string()
}
