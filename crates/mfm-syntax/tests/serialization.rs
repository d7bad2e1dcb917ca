//! The JSON shape renderers consume.

use mfm_syntax::parse;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn to_json(input: &str) -> Value {
    serde_json::to_value(parse(input)).unwrap()
}

#[test]
fn every_node_has_type_props_children() {
    fn check(value: &Value) {
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 3, "unexpected keys in {value}");
        assert!(object["type"].is_string());
        assert!(object["props"].is_object());
        for child in object["children"].as_array().unwrap() {
            check(child);
        }
    }

    let input = "<center>**a** @b@c.d #e :f: 😇 `g` \\(h\\) [i](https://j) $[k.l=m,n o]</center>";
    for node in to_json(input).as_array().unwrap() {
        check(node);
    }
}

#[test]
fn mention_and_link() {
    assert_eq!(
        to_json("@ai ?[x](https://y)"),
        json!([
            { "type": "mention", "props": { "username": "ai", "host": null, "acct": "@ai" }, "children": [] },
            { "type": "text", "props": { "text": " " }, "children": [] },
            {
                "type": "link",
                "props": { "url": "https://y", "silent": true },
                "children": [{ "type": "text", "props": { "text": "x" }, "children": [] }]
            }
        ])
    );
}

#[test]
fn big_is_tada_function() {
    assert_eq!(
        to_json("***a***"),
        json!([{
            "type": "fn",
            "props": { "name": "tada", "args": {} },
            "children": [{ "type": "text", "props": { "text": "a" }, "children": [] }]
        }])
    );
}

#[test]
fn code_block_without_lang() {
    assert_eq!(
        to_json("```\nx\n```"),
        json!([{ "type": "blockCode", "props": { "code": "x", "lang": null }, "children": [] }])
    );
}

#[test]
fn search_and_math() {
    assert_eq!(
        to_json("\\[x\\]\nmisskey 検索"),
        json!([
            { "type": "mathBlock", "props": { "formula": "x" }, "children": [] },
            { "type": "text", "props": { "text": "\n" }, "children": [] },
            { "type": "search", "props": { "query": "misskey", "content": "misskey 検索" }, "children": [] }
        ])
    );
}
