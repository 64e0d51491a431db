use super::*;

fn artifact(text: &str) -> ListArtifact {
    ListArtifact::new(text, "stubs")
}

fn add(text: &str, names: &[&str]) -> String {
    apply(&artifact(text), &ChangeSet::adding(names.iter().copied()))
        .unwrap()
        .text()
        .to_string()
}

fn remove(text: &str, names: &[&str]) -> String {
    apply(&artifact(text), &ChangeSet::removing(names.iter().copied()))
        .unwrap()
        .text()
        .to_string()
}

const MULTILINE: &str = "# project stubs\n\
stubs = [\n    \"esp32\",  # board\n    \"rp2\",\n]\nother = [\"keep\"]\n";

const JSON: &str = "{\n  \"name\": \"demo\",\n  \"stubs\": [\n    \"esp32\",\n    \"rp2\"\n  ]\n}\n";

#[test]
fn test_add_to_empty_list_keeps_order() {
    for names in [
        vec!["a"],
        vec!["a", "b", "c"],
        vec!["micropython-rp2-stubs", "micropython-esp32-stubs"],
    ] {
        let result = apply(&artifact("stubs = []\n"), &ChangeSet::adding(names.clone())).unwrap();
        assert_eq!(result.entries().unwrap(), names);
    }
    assert_eq!(add("stubs = []\n", &["a", "b", "c"]), "stubs = [\"a\", \"b\", \"c\"]\n");
}

#[test]
fn test_duplicate_adds_are_skipped() {
    assert_eq!(add("stubs = [\"a\"]", &["b", "a", "b"]), "stubs = [\"a\", \"b\"]");
}

#[test]
fn test_empty_change_is_byte_identical() {
    for text in [MULTILINE, JSON, "stubs=[ ]  # nothing yet\n"] {
        let result = apply(&artifact(text), &ChangeSet::default()).unwrap();
        assert_eq!(result.text(), text);
    }
}

#[test]
fn test_reapplying_is_a_no_op() {
    let change = ChangeSet::from_strings(["samd", "esp8266"], ["rp2"]);
    for text in [MULTILINE, JSON, "stubs = []", "stubs = [\n]\n", "stubs: ['a', 'rp2']"] {
        let once = apply(&artifact(text), &change).unwrap();
        let twice = apply(&once, &change).unwrap();
        assert_eq!(once, twice, "second application changed {text:?}");
    }
}

#[test]
fn test_anchor_not_found() {
    let result = apply(&artifact("modules = [\"a\"]\n"), &ChangeSet::adding(["b"]));
    assert!(matches!(
        result,
        Err(StubError::AnchorNotFound { ref anchor, .. }) if anchor == "stubs"
    ));
}

#[test]
fn test_unterminated_list_is_malformed() {
    let result = apply(&artifact("stubs = [\"a\", \"b\"\n"), &ChangeSet::adding(["c"]));
    assert!(matches!(result, Err(StubError::MalformedArtifact { .. })));
}

#[test]
fn test_contradictory_change_is_rejected() {
    let result = apply(
        &artifact("stubs = []"),
        &ChangeSet::from_strings(["a"], ["a"]),
    );
    assert!(matches!(result, Err(StubError::ContradictoryChange { .. })));
}

#[test]
fn test_multiline_add_follows_indent_and_trailing_comma() {
    let expected = "# project stubs\n\
stubs = [\n    \"esp32\",  # board\n    \"rp2\",\n    \"samd\",\n]\nother = [\"keep\"]\n";
    assert_eq!(add(MULTILINE, &["samd"]), expected);
}

#[test]
fn test_multiline_remove_drops_whole_line() {
    let expected = "# project stubs\n\
stubs = [\n    \"esp32\",  # board\n]\nother = [\"keep\"]\n";
    assert_eq!(remove(MULTILINE, &["rp2"]), expected);
}

#[test]
fn test_remove_keeps_comment_of_removed_line() {
    let result = apply(&artifact(MULTILINE), &ChangeSet::removing(["esp32"])).unwrap();
    assert!(result.text().contains("# board"));
    assert!(result.text().starts_with("# project stubs\n"));
    assert!(result.text().ends_with("]\nother = [\"keep\"]\n"));
    assert_eq!(result.entries().unwrap(), vec!["rp2"]);
}

#[test]
fn test_json_list_stays_valid() {
    let added = add(JSON, &["samd"]);
    assert_eq!(
        added,
        "{\n  \"name\": \"demo\",\n  \"stubs\": [\n    \"esp32\",\n    \"rp2\",\n    \"samd\"\n  ]\n}\n"
    );
    let parsed: serde_json::Value = serde_json::from_str(&added).unwrap();
    assert_eq!(parsed["stubs"].as_array().map(Vec::len), Some(3));

    let removed = remove(JSON, &["rp2"]);
    assert_eq!(
        removed,
        "{\n  \"name\": \"demo\",\n  \"stubs\": [\n    \"esp32\"\n  ]\n}\n"
    );
    let parsed: serde_json::Value = serde_json::from_str(&removed).unwrap();
    assert_eq!(parsed["stubs"][0], "esp32");
}

#[test]
fn test_inline_removals() {
    let text = "stubs = [\"a\", \"b\", \"c\"]";
    assert_eq!(remove(text, &["a"]), "stubs = [\"b\", \"c\"]");
    assert_eq!(remove(text, &["b"]), "stubs = [\"a\", \"c\"]");
    assert_eq!(remove(text, &["c"]), "stubs = [\"a\", \"b\"]");
    assert_eq!(remove(text, &["a", "b", "c"]), "stubs = []");
    assert_eq!(remove(text, &["missing"]), text);
}

#[test]
fn test_inline_trailing_comma_is_kept() {
    assert_eq!(add("stubs = [\"a\",]", &["b"]), "stubs = [\"a\", \"b\",]");
    assert_eq!(remove("stubs = [\"a\", \"b\",]", &["b"]), "stubs = [\"a\",]");
    assert_eq!(remove("stubs = [\"a\",]", &["a"]), "stubs = []");
}

#[test]
fn test_inline_separator_is_copied() {
    assert_eq!(add("stubs=[\"a\",\"b\"]", &["c"]), "stubs=[\"a\",\"b\",\"c\"]");
}

#[test]
fn test_single_quotes_are_inferred() {
    let result = apply(
        &ListArtifact::new("modules = ['os', 'sys']\n", "modules"),
        &ChangeSet::adding(["machine"]),
    )
    .unwrap();
    assert_eq!(result.text(), "modules = ['os', 'sys', 'machine']\n");
}

#[test]
fn test_empty_multiline_list_gets_default_indent() {
    assert_eq!(
        add("stubs = [\n]\n", &["a", "b"]),
        "stubs = [\n    \"a\",\n    \"b\",\n]\n"
    );
}

#[test]
fn test_yaml_flow_sequence_keeps_trailing_comment() {
    let text = "name: demo\nstubs: [\"esp32\"]  # managed by mpstubs\n";
    assert_eq!(
        add(text, &["rp2"]),
        "name: demo\nstubs: [\"esp32\", \"rp2\"]  # managed by mpstubs\n"
    );
}

#[test]
fn test_add_then_remove_restores_original() {
    for text in [MULTILINE, JSON, "stubs = [\"a\", \"b\"]"] {
        let added = apply(&artifact(text), &ChangeSet::adding(["extra"])).unwrap();
        let restored = apply(&added, &ChangeSet::removing(["extra"])).unwrap();
        assert_eq!(restored.text(), text);
    }
}

#[test]
fn test_anchor_mentioned_in_string_is_ignored() {
    let text = "description = \"stubs = [x]\"\nstubs = []\n";
    assert_eq!(
        add(text, &["a"]),
        "description = \"stubs = [x]\"\nstubs = [\"a\"]\n"
    );
}

#[test]
fn test_anchor_inside_string_value_is_ignored() {
    let text = "description = \"my stubs = [x]\"\nstubs = []\n";
    assert_eq!(
        add(text, &["a"]),
        "description = \"my stubs = [x]\"\nstubs = [\"a\"]\n"
    );
}

#[test]
fn test_quoted_key_inside_string_is_ignored() {
    let text = "note = 'see \"stubs\": [x]'\n\"stubs\": []\n";
    assert_eq!(
        add(text, &["a"]),
        "note = 'see \"stubs\": [x]'\n\"stubs\": [\"a\"]\n"
    );
}

#[test]
fn test_prefix_and_suffix_are_untouched() {
    let prefix = "# -*- coding: utf-8 -*-\n\n  x = 1  # weird   spacing\n";
    let suffix = "\n\n\ttrailing = \"text\"\n";
    let text = format!("{prefix}stubs = [\"a\"]{suffix}");
    let result = apply(
        &artifact(&text),
        &ChangeSet::from_strings(["b", "c"], ["a"]),
    )
    .unwrap();
    assert!(result.text().starts_with(&format!("{prefix}stubs = [")));
    assert!(result.text().ends_with(&format!("]{suffix}")));
    assert_eq!(result.entries().unwrap(), vec!["b", "c"]);
}

#[test]
fn test_save_and_load_round_trip() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("mpstubs.yaml");
    std::fs::write(&path, "stubs: []\n").unwrap();

    let loaded = ListArtifact::load(&path, "stubs").unwrap();
    let updated = apply(&loaded, &ChangeSet::adding(["esp32"])).unwrap();
    updated.save(&path).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "stubs: [\"esp32\"]\n");
    let leftovers: Vec<_> = std::fs::read_dir(temp.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1);
}
