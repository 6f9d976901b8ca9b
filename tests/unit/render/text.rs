use super::*;

fn run(text: &str, italic: bool, bold: bool) -> Run {
    Run {
        text: text.to_string(),
        italic,
        bold,
    }
}

#[test]
fn markup_toggles_styles() {
    assert_eq!(
        parse_markup("{bold}Flying{/bold} and {i}grace{/i}."),
        vec![
            run("Flying", false, true),
            run(" and ", false, false),
            run("grace", true, false),
            run(".", false, false),
        ]
    );
}

#[test]
fn unknown_tokens_and_unclosed_braces_stay_literal() {
    assert_eq!(
        parse_markup("Pay {R}: win {oops"),
        vec![run("Pay {R}: win {oops", false, false)]
    );
}

#[test]
fn wrap_breaks_on_word_budget_and_keeps_styles() {
    let runs = vec![run("aaa bbb", false, false), run("ccc", true, false)];
    let lines = wrap_runs(&runs, 7);
    assert_eq!(
        lines,
        vec![
            vec![run("aaa", false, false), run(" bbb", false, false)],
            vec![run("ccc", true, false)],
        ]
    );
}

#[test]
fn overlong_word_gets_its_own_line() {
    let lines = wrap_runs(&[run("a verylongword b", false, false)], 4);
    assert_eq!(lines.len(), 3);
}

#[test]
fn escapes_xml_specials() {
    assert_eq!(xml_escape(r#"<a & "b">"#), "&lt;a &amp; &quot;b&quot;&gt;");
}

#[test]
fn text_layer_contains_fields_and_parses() {
    let content = CardContent {
        title: "Goblin & King".to_string(),
        type_line: "Legendary Creature \u{2014} Goblin".to_string(),
        mana_symbols: vec!['1', 'R'],
        power_toughness: "2/2".to_string(),
        rules_text: "Haste\n{i}Fear.{/i}".to_string(),
        ..CardContent::default()
    };
    let canvas = Canvas {
        width: 200,
        height: 280,
    };
    let svg = text_layer_svg(&content, &CardLayout::default(), canvas);
    assert!(svg.contains("Goblin &amp; King"));
    assert!(svg.contains("2/2"));
    assert!(svg.contains(r#"font-style="italic""#));
    assert_eq!(svg.matches("<circle").count(), 2);
    usvg::Tree::from_str(&svg, &usvg::Options::default()).unwrap();
}
