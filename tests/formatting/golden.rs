#[cfg(test)]
mod examples {
    use std::fs;
    use std::path::Path;

    use heexfmt::formatting::*;
    use heexfmt::language::Options;
    use heexfmt::parsing;

    /// Golden test for the format command
    ///
    /// This test:
    /// 1. Reads all .heex files from tests/golden/
    /// 2. Runs the equivalent of the `format` command on each file
    /// 3. Compares the formatted output with the original input
    /// 4. Shows clear diffs when differences are found
    ///
    /// The test expects files to be in their canonical formatted form. If
    /// files fail this test, either the tokenizer & formatter is wrong (a
    /// bug that needs to be fixed!) or possibly the sample file is wrong
    /// (perhaps because of a deliberate style change, and they thus might
    /// need reformatting)

    /// Simple diff function to show line-by-line differences
    fn show_diff(original: &str, formatted: &str, file_path: &Path) {
        let original_lines: Vec<&str> = original
            .lines()
            .collect();
        let formatted_lines: Vec<&str> = formatted
            .lines()
            .collect();

        let max_lines = original_lines
            .len()
            .max(formatted_lines.len());

        println!("\nDifferences found in file: {:?}", file_path);
        println!("--- Original");
        println!("+++ Formatted");

        for i in 0..max_lines {
            let orig_line = original_lines
                .get(i)
                .unwrap_or(&"");
            let fmt_line = formatted_lines
                .get(i)
                .unwrap_or(&"");

            if orig_line != fmt_line {
                println!("@@ Line {} @@", i + 1);
                println!("- {}", orig_line);
                println!("+ {}", fmt_line);
            }
        }
    }

    fn format_file(file: &Path) -> (String, String) {
        let original = parsing::load(file)
            .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));

        let tokens = parsing::parse(&original)
            .unwrap_or_else(|e| panic!("Failed to tokenize file {:?}: {:?}", file, e));

        let result = render(&Identity, &tokens, &Passthrough, &Options::default())
            .unwrap_or_else(|e| panic!("Failed to format file {:?}: {:?}", file, e));

        (original, result)
    }

    #[test]
    fn ensure_identical_output() {
        let dir = Path::new("tests/golden");

        // Ensure the directory exists
        assert!(dir.exists(), "golden directory missing");

        let entries = fs::read_dir(dir).expect("Failed to read golden directory");

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.expect("Failed to read directory entry");
            let path = entry.path();

            if path
                .extension()
                .and_then(|s| s.to_str())
                == Some("heex")
            {
                files.push(path);
            }
        }

        // Ensure we found some test files
        assert!(!files.is_empty(), "No .heex files found in golden directory");

        let mut failures = Vec::new();

        for file in &files {
            let (original, result) = format_file(file);

            // They should be identical for well-formed files
            if result != original {
                failures.push(file.clone());
            }
        }

        // If any files had differences, show detailed diffs and fail
        if !failures.is_empty() {
            for file_path in &failures {
                let (original, result) = format_file(file_path);
                show_diff(&original, &result, file_path);
            }

            panic!("All samples must format unchanged");
        }
    }

    #[test]
    fn highlighting_preserves_layout() {
        let file = Path::new("tests/golden/orders.heex");
        let original = parsing::load(file).unwrap();
        let tokens = parsing::parse(&original).unwrap();

        let plain = render(&Identity, &tokens, &Passthrough, &Options::default()).unwrap();
        let coloured = render(&Terminal, &tokens, &Passthrough, &Options::default()).unwrap();

        assert_ne!(plain, coloured);
        assert_eq!(
            plain.lines().count(),
            coloured.lines().count()
        );
    }
}
