#[cfg(test)]
mod verify {
    use heexfmt::formatting::*;
    use heexfmt::language::*;
    use heexfmt::parsing;

    fn trim(text: &str) -> &str {
        text.trim_start_matches('\n')
    }

    fn reformat(source: &str, options: &Options) -> String {
        let tokens = parsing::parse(source).unwrap();
        format(&tokens, options).unwrap()
    }

    #[test]
    fn untidy_markup() {
        let source = r#"<div><p>
Hello</p>
<%= if @x do %><span>yes</span><% end %></div>"#;

        let result = reformat(source, &Options::default());
        assert_eq!(
            result,
            trim(
                r#"
<div>
  <p>Hello</p>
  <%= if @x do %>
    <span>yes</span>
  <% end %>
</div>
"#
            )
        );

        // and formatting that again changes nothing
        assert_eq!(reformat(&result, &Options::default()), result);
    }

    #[test]
    fn non_rendering_control_flow() {
        let source = "<ul><%= for x <- @xs do %><% if x.ok do %><li>ok</li><% end %><% end %></ul>";

        let result = reformat(source, &Options::default());
        assert_eq!(
            result,
            trim(
                r#"
<ul>
  <%= for x <- @xs do %>
    <% if x.ok do %>
      <li>ok</li>
    <% end %>
  <% end %>
</ul>
"#
            )
        );
        assert_eq!(reformat(&result, &Options::default()), result);

        let source = "<% case @x do %><% :a -> %>A<% :b -> %>B<% end %>";

        let result = reformat(source, &Options::default());
        assert_eq!(
            result,
            trim(
                r#"
<% case @x do %>
  <% :a -> %>
    A
  <% :b -> %>
    B
<% end %>
"#
            )
        );
        assert_eq!(reformat(&result, &Options::default()), result);
    }

    #[test]
    fn formatting_twice_changes_nothing() {
        let samples = [
            "<p class=\"lead\">Hello</p>",
            "<p>Hello <%= @name %>, welcome</p>",
            "<div><%= case @s do %><% :a -> %>A<% _ -> %>B<% end %></div>",
            "<pre>  keep   \n  this</pre>",
            "<!DOCTYPE html><html><body><br/><img src=\"x\"/></body></html>",
        ];

        for sample in samples {
            let once = reformat(sample, &Options::default());
            let twice = reformat(&once, &Options::default());
            assert_eq!(once, twice, "formatting {:?} again", sample);
        }

        assert_eq!(
            reformat(samples[4], &Options::default()),
            trim(
                r#"
<!DOCTYPE html>
<html>
  <body>
    <br />
    <img src="x" />
  </body>
</html>
"#
            )
        );
    }

    #[test]
    fn stray_indentation_is_discarded() {
        let source = r#"
        <ul>
                <li>One</li>



      <li>Two</li>
   </ul>
"#;

        let result = reformat(source, &Options::default());
        assert_eq!(result, "<ul>\n  <li>One</li>\n\n  <li>Two</li>\n</ul>\n");
    }

    #[test]
    fn line_length_option() {
        let source = r#"<img src="a.png" alt="A">"#;

        let result = reformat(source, &Options::default());
        assert_eq!(result, "<img src=\"a.png\" alt=\"A\">\n");

        let result = reformat(source, &Options::with_line_length(10));
        assert_eq!(
            result,
            trim(
                r#"
<img
  src="a.png"
  alt="A"
>
"#
            )
        );
        assert_eq!(reformat(&result, &Options::with_line_length(10)), result);
    }

    #[test]
    fn comments_with_embedded_expressions() {
        let source = "<div>\n<!-- shown to <%= @name  %>\n   only -->\n<p>Hi</p></div>";

        let result = reformat(source, &Options::default());
        assert_eq!(
            result,
            "<div>\n  <!-- shown to <%= @name  %>\n   only -->\n  <p>Hi</p>\n</div>\n"
        );
        assert_eq!(reformat(&result, &Options::default()), result);
    }

    #[test]
    fn script_contents_untouched() {
        let source = "<body>\n<script>\n  if (a < b) { go(); }\n</script>\n</body>";

        let result = reformat(source, &Options::default());
        assert_eq!(
            result,
            "<body>\n  <script>\n  if (a < b) { go(); }\n  </script>\n</body>\n"
        );
    }

    #[test]
    fn escaped_expression_is_text() {
        let result = reformat("<p><%% not code %></p>", &Options::default());
        assert_eq!(result, "<p><%% not code %></p>\n");
    }

    #[test]
    fn token_streams_from_elsewhere() {
        let json = r#"
[
    { "kind": "tag_open", "name": "ul", "attributes": [{ "named": { "name": "class", "value": { "type": "string", "value": "list" } } }] },
    { "kind": "expr_tag_render", "content": " for x <- @xs do ", "meta": { "block": true } },
    { "kind": "tag_open", "name": "li" },
    { "kind": "expr_tag_render", "content": "x" },
    { "kind": "tag_close", "name": "li" },
    { "kind": "expr_tag", "content": " end " },
    { "kind": "tag_close", "name": "ul" }
]
"#;
        let tokens = parsing::decode(json).unwrap();
        let result = format(&tokens, &Options::default()).unwrap();
        assert_eq!(
            result,
            trim(
                r#"
<ul class="list">
  <%= for x <- @xs do %>
    <li>
      <%= x %>
    </li>
  <% end %>
</ul>
"#
            )
        );
    }

    #[cfg(unix)]
    #[test]
    fn external_expression_formatter() {
        let tokens = parsing::parse("<%= if @x do %>yes<% end %>").unwrap();

        let cat = External::new("cat");
        let result = render(&Identity, &tokens, &cat, &Options::default());
        assert_eq!(
            result,
            Ok("<%= if @x do %>\n  yes\n<% end %>\n".to_string())
        );

        let rejecting = External::new("false");
        let result = render(&Identity, &tokens, &rejecting, &Options::default());
        assert!(result.is_err());

        let missing = External::new("heexfmt-no-such-formatter --check");
        let result = render(&Identity, &tokens, &missing, &Options::default());
        match result {
            Err(FormattingError::Spawn { program, .. }) => {
                assert_eq!(program, "heexfmt-no-such-formatter")
            }
            _ => panic!("expected a spawn failure"),
        }
    }
}
