#[cfg(test)]
mod verify {
    use heexfmt::language::*;
    use heexfmt::parsing;

    #[test]
    fn minimal_tokens_from_another_tokenizer() {
        let json = r#"
[
    { "kind": "tag_open", "name": "br", "meta": { "self_close": true } },
    { "kind": "text", "content": "<!-- x -->", "meta": { "context": ["comment_start", "comment_end"] } },
    { "kind": "tag_open", "name": "div", "attributes": [{ "root": "@rest" }, { "named": { "name": "hidden" } }] }
]
"#;
        let tokens = parsing::decode(json).unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::TagOpen {
                    name: "br".to_string(),
                    attributes: vec![],
                    meta: TagMeta {
                        position: Position::default(),
                        self_close: true,
                    },
                },
                Token::Text {
                    content: "<!-- x -->".to_string(),
                    meta: TextMeta {
                        position: Position::default(),
                        context: vec![Context::CommentStart, Context::CommentEnd],
                    },
                },
                Token::TagOpen {
                    name: "div".to_string(),
                    attributes: vec![Attribute::Root("@rest".to_string()), Attribute::bare("hidden")],
                    meta: TagMeta::default(),
                },
            ]
        );
    }

    #[test]
    fn tokens_survive_interchange() {
        let source = r#"<div class="a" {@rest}><%= if @b do %><!-- c --><% end %></div>"#;
        let tokens = parsing::parse(source).unwrap();

        let json = parsing::encode(&tokens).unwrap();
        assert!(json.contains(r#""kind": "expr_tag_render""#));

        assert_eq!(parsing::decode(&json).unwrap(), tokens);
    }

    #[test]
    fn malformed_streams() {
        assert!(parsing::decode(r#"[{ "kind": "tag_open" }]"#).is_err());
        assert!(parsing::decode(r#"[{ "kind": "doctype", "content": "html" }]"#).is_err());
        assert!(parsing::decode("not json").is_err());
    }
}
