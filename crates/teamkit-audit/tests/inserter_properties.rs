use proptest::prelude::*;
use teamkit_audit::{TemplateInserter, SHARED_TEMPLATES};

fn line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("templates:".to_string()),
        Just("templates:  ".to_string()),
        Just("---".to_string()),
        Just("kind: team".to_string()),
        Just("  tools: |".to_string()),
        Just("  status: |".to_string()),
        Just("  notes: |".to_string()),
        Just("  lead.tools: |".to_string()),
        Just("    body".to_string()),
        Just(String::new()),
        "[ a-z:|.-]{0,16}",
    ]
}

fn document() -> impl Strategy<Value = String> {
    (
        any::<bool>(),
        proptest::collection::vec(line(), 0..12),
        proptest::collection::vec(line(), 0..6),
    )
        .prop_map(|(frontmatter, inner, tail)| {
            let mut text = String::new();
            if frontmatter {
                text.push_str("---\n");
            }
            for l in inner {
                text.push_str(&l);
                text.push('\n');
            }
            if frontmatter {
                text.push_str("---\n");
            }
            for l in tail {
                text.push_str(&l);
                text.push('\n');
            }
            text
        })
}

proptest! {
    #[test]
    fn prop_patch_is_idempotent(text in document()) {
        let inserter = TemplateInserter::new();
        let once = inserter.patch(&text).into_text();
        let twice = inserter.patch(&once);

        prop_assert!(!twice.changed());
        prop_assert_eq!(&*twice.text, once.as_str());
    }

    #[test]
    fn prop_unchanged_means_identical(text in document()) {
        let out = TemplateInserter::new().patch(&text);
        if !out.changed() {
            prop_assert_eq!(&*out.text, text.as_str());
        }
    }

    #[test]
    fn prop_insertion_is_single_contiguous_block(text in document()) {
        let out = TemplateInserter::new().patch(&text);
        if out.changed() {
            let at = TemplateInserter::anchor_end(&text).unwrap();
            let inserted = format!("\n{}", SHARED_TEMPLATES.text());

            prop_assert!(text[..at].ends_with('\n'));
            prop_assert_eq!(&out.text[..at], &text[..at]);
            prop_assert_eq!(&out.text[at..at + inserted.len()], inserted.as_str());
            prop_assert_eq!(&out.text[at + inserted.len()..], &text[at..]);
            prop_assert!(TemplateInserter::new().missing_keys(&out.text).is_empty());
        }
    }

    #[test]
    fn prop_arbitrary_text_never_panics(text in "\\PC{0,200}") {
        let out = TemplateInserter::new().patch(&text);
        if !out.changed() {
            prop_assert_eq!(&*out.text, text.as_str());
        }
    }
}

#[test]
fn already_covered_in_other_style_is_untouched() {
    let text = "---\ntemplates:\n  status: |\n    custom\n  notes: |\n    custom\n  tools: |\n    custom\n---\n";
    let out = TemplateInserter::new().patch(text);
    assert!(!out.changed());
    assert_eq!(out.text, text);
}
