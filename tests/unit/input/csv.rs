use super::*;

#[test]
fn header_trimmed_and_rows_zipped() {
    let rows = parse_csv("Cards , Type,Mana cost\nGoblin King,Creature,1R\n");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("Cards"), Some("Goblin King"));
    assert_eq!(rows[0].get("Type"), Some("Creature"));
    assert_eq!(rows[0].get("Mana cost"), Some("1R"));
}

#[test]
fn commas_inside_quotes_do_not_split() {
    let rows = parse_csv("Cards,Ability\n\"Goblin, King\",\"Haste, trample\"\n");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("Cards"), Some("Goblin, King"));
    assert_eq!(rows[0].get("Ability"), Some("Haste, trample"));
}

#[test]
fn mismatched_field_counts_are_dropped() {
    let text = "Cards,Type\nA,Creature\nB,Instant,extra\nC\nD,Sorcery\n";
    let rows = parse_csv(text);
    let titles: Vec<_> = rows.iter().map(|r| r.get("Cards").unwrap()).collect();
    assert_eq!(titles, vec!["A", "D"]);
}

#[test]
fn crlf_line_endings_are_stripped() {
    let rows = parse_csv("Cards,p/t\r\nBear,2/2\r\n\"Elf\",\"1/1\"\r\n");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("p/t"), Some("2/2"));
    assert_eq!(rows[1].get("Cards"), Some("Elf"));
    assert_eq!(rows[1].get("p/t"), Some("1/1"));
}

#[test]
fn only_one_quote_stripped_per_side() {
    let rows = parse_csv("Cards,Quote\nX,\"\"Hi\"\"\n");
    assert_eq!(rows[0].get("Quote"), Some("\"Hi\""));
}

#[test]
fn unbalanced_quote_follows_lookahead_rule() {
    // The first comma has one quote after it (odd), so it stays inside the field.
    let rows = parse_csv("A,B\nx,\"y\n");
    assert!(rows.is_empty());
    let rows = parse_csv("A,B\nx,\"y,z\n");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("A"), Some("x,\"y"));
    assert_eq!(rows[0].get("B"), Some("z"));
}

#[test]
fn empty_input_has_no_rows() {
    assert!(parse_csv("").is_empty());
    assert!(parse_csv("Cards,Type").is_empty());
}

#[test]
fn non_empty_filters_blank_values() {
    let row = CardRow::from_pairs([("Cards", "  "), ("Type", " Land ")]);
    assert_eq!(row.non_empty("Cards"), None);
    assert_eq!(row.non_empty("Type"), Some("Land"));
    assert_eq!(row.non_empty("Missing"), None);
}
