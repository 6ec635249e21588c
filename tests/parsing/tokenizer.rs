#[cfg(test)]
mod verify {
    use heexfmt::language::*;
    use heexfmt::parsing::{self, ParsingError};

    #[test]
    fn component_markup() {
        let tokens = parsing::parse(r#"<.link navigate={~p"/users/#{@user}"} class="btn">Show</.link>"#)
            .unwrap();

        assert_eq!(tokens.len(), 3);
        match &tokens[0] {
            Token::TagOpen {
                name, attributes, ..
            } => {
                assert_eq!(name, ".link");
                assert_eq!(
                    attributes,
                    &vec![
                        Attribute::expression("navigate", r#"~p"/users/#{@user}""#),
                        Attribute::string("class", "btn"),
                    ]
                );
            }
            _ => panic!("expected an opening tag"),
        }
    }

    #[test]
    fn expression_kinds() {
        let tokens = parsing::parse("<%= @a %><% b = 1 %><%# note %>").unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::ExprTagRender {
                    content: " @a ".to_string(),
                    meta: ExprMeta {
                        position: Position::new(1, 1),
                        block: false,
                    },
                },
                Token::ExprTag {
                    content: " b = 1 ".to_string(),
                    meta: ExprMeta {
                        position: Position::new(1, 10),
                        block: false,
                    },
                },
                Token::ExprTag {
                    content: "# note ".to_string(),
                    meta: ExprMeta {
                        position: Position::new(1, 21),
                        block: false,
                    },
                },
            ]
        );
    }

    #[test]
    fn block_openers_are_marked() {
        let tokens = parsing::parse("<%= case @x do %><% :a -> %><% end %>").unwrap();

        let blocks: Vec<bool> = tokens
            .iter()
            .map(|token| match token {
                Token::ExprTag { meta, .. } | Token::ExprTagRender { meta, .. } => meta.block,
                _ => false,
            })
            .collect();
        assert_eq!(blocks, vec![true, true, false]);
    }

    #[test]
    fn comment_chunks_carry_context() {
        let tokens = parsing::parse("<!-- a <%= @b %> c -->").unwrap();

        assert_eq!(tokens.len(), 3);
        match (&tokens[0], &tokens[2]) {
            (
                Token::Text {
                    content: first,
                    meta: start,
                },
                Token::Text {
                    content: last,
                    meta: end,
                },
            ) => {
                assert_eq!(first, "<!-- a ");
                assert_eq!(start.context, vec![Context::CommentStart]);
                assert_eq!(last, " c -->");
                assert_eq!(end.context, vec![Context::CommentEnd]);
            }
            _ => panic!("expected comment text around the expression"),
        }
    }

    #[test]
    fn broken_templates() {
        assert_eq!(
            parsing::parse("<p><%= @a </p>"),
            Err(ParsingError::UnterminatedExpression(3))
        );
        assert_eq!(
            parsing::parse("<div class=\"a"),
            Err(ParsingError::UnterminatedAttribute(11))
        );
        assert_eq!(
            parsing::parse("<div\n  class=\"a\""),
            Err(ParsingError::UnterminatedTag(0))
        );
        assert_eq!(
            parsing::parse("ok <!-- never closed"),
            Err(ParsingError::UnterminatedComment(3))
        );
        assert_eq!(parsing::parse("</ >"), Err(ParsingError::InvalidTagName(0)));
        assert_eq!(
            parsing::parse("<div <%= @attrs %>>"),
            Err(ParsingError::ExpressionInsideTag(5))
        );
    }
}
