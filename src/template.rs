//! The agreement document template
//!
//! A pure mapping from a draft snapshot to the visual document: fixed legal
//! markup instantiated by token substitution, with every interpolated value
//! XML-escaped. Rendering is total and idempotent; any draft value, including
//! an all-empty one, produces a valid document.

use crate::draft::{AgreementDraft, PENDING_SIGNATURE};
use chrono::{Local, NaiveDate};

/// Placeholder shown in the name slot while the field is empty
pub const PLACEHOLDER_NAME: &str = "Enter Full Name";

/// Placeholder shown in the email slot while the field is empty
pub const PLACEHOLDER_EMAIL: &str = "Enter Email Address";

/// Blank line shown for the signer name until a name is entered
const BLANK_NAME_LINE: &str = "________________";

/// Hint shown on the signature line until a name is entered
const SIGNATURE_HINT: &str = "Digital Signature will appear here";

const INK_FILL: &str = "#0f284e";
const SIGNED_FILL: &str = "#1e3a8a";
const PLACEHOLDER_FILL: &str = "#d1d5db";

/// Options for instantiating the template
///
/// `issue_date` is the read-only date shown in the counterparty signature
/// block. It defaults to the current local date; tests and golden fixtures
/// pin it so rendering stays deterministic.
#[derive(Debug, Clone)]
pub struct TemplateOptions {
    pub issue_date: NaiveDate,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            issue_date: Local::now().date_naive(),
        }
    }
}

/// Render the agreement document for the given draft as SVG markup.
pub fn render_agreement(draft: &AgreementDraft, options: &TemplateOptions) -> String {
    let (name_value, name_fill) = if draft.name.is_empty() {
        (PLACEHOLDER_NAME.to_string(), PLACEHOLDER_FILL)
    } else {
        (xml_escape(&draft.name), INK_FILL)
    };

    let (email_value, email_fill) = if draft.email.is_empty() {
        (PLACEHOLDER_EMAIL.to_string(), PLACEHOLDER_FILL)
    } else {
        (xml_escape(&draft.email), INK_FILL)
    };

    let digital_sig = match draft.signature_text() {
        Some(sig) => xml_escape(&sig),
        None => PENDING_SIGNATURE.to_string(),
    };

    let signer_name = if draft.name.is_empty() {
        BLANK_NAME_LINE.to_string()
    } else {
        xml_escape(&draft.name)
    };

    // The signature line doubles as its own hint: smaller, italic, and grey
    // until a name is entered.
    let (sig_line, sig_fill, sig_size, sig_style) = match draft.signature_text() {
        Some(sig) => (xml_escape(&sig), SIGNED_FILL, "17", "normal"),
        None => (SIGNATURE_HINT.to_string(), PLACEHOLDER_FILL, "10", "italic"),
    };

    include_str!("agreement.svg")
        .replace("__AK_NAME_VALUE__", &name_value)
        .replace("__AK_NAME_FILL__", name_fill)
        .replace("__AK_EMAIL_VALUE__", &email_value)
        .replace("__AK_EMAIL_FILL__", email_fill)
        .replace("__AK_DIGITAL_SIG__", &digital_sig)
        .replace("__AK_SIGNER_NAME__", &signer_name)
        .replace("__AK_SIGNATURE_LINE__", &sig_line)
        .replace("__AK_SIGNATURE_FILL__", sig_fill)
        .replace("__AK_SIGNATURE_SIZE__", sig_size)
        .replace("__AK_SIGNATURE_STYLE__", sig_style)
        .replace(
            "__AK_VOLUNTEER_DATE__",
            &draft.date.format("%Y-%m-%d").to_string(),
        )
        .replace(
            "__AK_ISSUE_DATE__",
            &options.issue_date.format("%m/%d/%Y").to_string(),
        )
}

/// Escape a value for inclusion in XML text content or attribute values.
fn xml_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_options() -> TemplateOptions {
        TemplateOptions {
            issue_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        }
    }

    fn draft(name: &str, email: &str, date: (i32, u32, u32)) -> AgreementDraft {
        AgreementDraft {
            name: name.to_string(),
            email: email.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        }
    }

    #[test]
    fn renders_entered_values_verbatim() {
        let markup = render_agreement(
            &draft("Jane Doe", "jane@example.com", (2025, 6, 1)),
            &fixed_options(),
        );
        assert!(markup.contains(">Jane Doe<"));
        assert!(markup.contains(">jane@example.com<"));
        assert!(!markup.contains(PLACEHOLDER_NAME));
        assert!(!markup.contains(PLACEHOLDER_EMAIL));
    }

    #[test]
    fn renders_placeholders_for_empty_fields() {
        let markup = render_agreement(&draft("", "", (2025, 6, 1)), &fixed_options());
        assert!(markup.contains(PLACEHOLDER_NAME));
        assert!(markup.contains(PLACEHOLDER_EMAIL));
        assert!(markup.contains(PENDING_SIGNATURE));
        assert!(markup.contains(BLANK_NAME_LINE));
        assert!(markup.contains(SIGNATURE_HINT));
    }

    #[test]
    fn signature_scenario_jane_doe() {
        let markup = render_agreement(
            &draft("Jane Doe", "", (2025, 6, 1)),
            &fixed_options(),
        );
        assert!(markup.contains("Jane_Doe_Accepted"));
        assert!(!markup.contains(PENDING_SIGNATURE));
        assert!(markup.contains("2025-06-01"));
    }

    #[test]
    fn issue_date_is_rendered_read_only() {
        let markup = render_agreement(&draft("", "", (2025, 6, 1)), &fixed_options());
        assert!(markup.contains("Date: 06/01/2025"));
    }

    #[test]
    fn fixed_furniture_is_always_present() {
        for d in [draft("", "", (2025, 6, 1)), draft("Jane", "j@e.c", (2024, 1, 2))] {
            let markup = render_agreement(&d, &fixed_options());
            assert!(markup.contains("GLOBAL U"));
            assert!(markup.contains("DIGITAL VOLUNTEER WORK AGREEMENT"));
            assert!(markup.contains("Global_LLC_Official"));
            assert!(markup.contains("2025 Global LLC. All rights reserved."));
        }
    }

    #[test]
    fn interpolated_values_are_escaped() {
        let markup = render_agreement(
            &draft("Jane <Doe> & Co", "a\"b@example.com", (2025, 6, 1)),
            &fixed_options(),
        );
        assert!(markup.contains("Jane &lt;Doe&gt; &amp; Co"));
        assert!(markup.contains("a&quot;b@example.com"));
        assert!(!markup.contains("Jane <Doe>"));
    }

    #[test]
    fn rendering_is_idempotent() {
        let d = draft("Jane Doe", "jane@example.com", (2025, 6, 1));
        let opts = fixed_options();
        assert_eq!(render_agreement(&d, &opts), render_agreement(&d, &opts));
    }

    #[test]
    fn no_tokens_survive_rendering() {
        for d in [draft("", "", (2025, 6, 1)), draft("Jane", "j@e.c", (2025, 6, 1))] {
            let markup = render_agreement(&d, &fixed_options());
            assert!(!markup.contains("__AK_"), "unreplaced token in markup");
        }
    }

    #[cfg(feature = "svg-raster")]
    #[test]
    fn rendered_markup_parses_as_svg() {
        let markup = render_agreement(
            &draft("Jane Doe", "jane@example.com", (2025, 6, 1)),
            &fixed_options(),
        );
        let tree = usvg::Tree::from_str(&markup, &usvg::Options::default())
            .expect("markup should be valid SVG");
        assert_eq!(tree.size().width().round() as u32, 794);
        assert_eq!(tree.size().height().round() as u32, 1123);
    }
}
