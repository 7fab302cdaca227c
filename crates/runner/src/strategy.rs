//! Text-only strategies for the languages that are not really executed

use language::LanguageId;

pub const JAVASCRIPT_NO_OUTPUT: &str = "Code executed successfully (no output)";
pub const PYTHON_FALLBACK: &str = "Python code executed successfully (simulated)";
pub const C_FAMILY_FALLBACK: &str = "Program compiled and executed successfully (simulated)";
pub const HTML_MESSAGE: &str =
    "HTML preview: open this file in a browser to view the rendered page.";

/// Message for languages with no simulation of their own; depends only on the language
pub fn generic_fallback(language: LanguageId) -> String {
    format!(
        "Code execution simulation completed for {}.",
        language.display_name()
    )
}

/// Literal arguments of `print("...")` / `print('...')` calls, one per line
pub(crate) fn python(content: &str) -> String {
    let lines: Vec<&str> = content.lines().filter_map(python_print).collect();
    join_or(lines, PYTHON_FALLBACK)
}

fn python_print(line: &str) -> Option<&str> {
    let line = line.trim();
    let start = line.find("print(")? + "print(".len();
    let rest = &line[start..];
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let (literal, after) = quoted(rest, quote)?;
    after.starts_with(')').then_some(literal)
}

/// The first string literal streamed into `cout`, one per line
pub(crate) fn cpp(content: &str) -> String {
    let lines: Vec<&str> = content.lines().filter_map(cout_literal).collect();
    join_or(lines, C_FAMILY_FALLBACK)
}

/// Like [`cpp`], and also picks up `printf("...")` format strings
pub(crate) fn c(content: &str) -> String {
    let lines: Vec<&str> = content
        .lines()
        .filter_map(|line| cout_literal(line).or_else(|| printf_literal(line)))
        .collect();
    join_or(lines, C_FAMILY_FALLBACK)
}

fn cout_literal(line: &str) -> Option<&str> {
    let shift = line.find("<<")?;
    if !line[..shift].contains("cout") {
        return None;
    }
    let rest = &line[shift + 2..];
    let open = rest.find('"')?;
    quoted(&rest[open..], '"').map(|(literal, _)| literal)
}

fn printf_literal(line: &str) -> Option<&str> {
    let start = line.find("printf(")? + "printf(".len();
    let rest = line[start..].trim_start();
    if !rest.starts_with('"') {
        return None;
    }
    let (literal, _) = quoted(rest, '"')?;
    Some(literal.strip_suffix("\\n").unwrap_or(literal))
}

/// Split `s`, which starts with `quote`, into the literal body and the text after the closing
/// quote. Backslash escapes are skipped over but left in the body.
fn quoted(s: &str, quote: char) -> Option<(&str, &str)> {
    let body = s.strip_prefix(quote)?;
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            c if c == quote => return Some((&body[..i], &body[i + c.len_utf8()..])),
            _ => {}
        }
    }
    None
}

fn join_or(lines: Vec<&str>, fallback: &str) -> String {
    if lines.is_empty() {
        fallback.to_string()
    } else {
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(r#"print("test")"#, "test")]
    #[case("print('single')", "single")]
    #[case(r#"    print("indented")"#, "indented")]
    #[case(r#"print("a \"quoted\" word")"#, r#"a \"quoted\" word"#)]
    #[case("x = 1\nprint(\"one\")\nprint('two')", "one\ntwo")]
    fn python_extracts_print_literals(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(python(source), expected);
    }

    #[rstest]
    #[case("x = 1")]
    #[case("print(x)")]
    #[case(r#"print(f"{x}")"#)]
    #[case(r#"print("a", b)"#)]
    #[case(r#"print("unterminated)"#)]
    #[case("")]
    fn python_falls_back(#[case] source: &str) {
        assert_eq!(python(source), PYTHON_FALLBACK);
    }

    #[test]
    fn python_template_prints_greeting() {
        assert_eq!(python(language::LanguageId::Python.template()), "Hello, World!");
    }

    #[rstest]
    #[case(r#"cout << "Hello, World!";"#, "Hello, World!")]
    #[case(r#"    std::cout << "x = " << x << std::endl;"#, "x = ")]
    #[case("cout << \"a\";\nint y = 2;\ncout << \"b\" << endl;", "a\nb")]
    fn cpp_extracts_cout_literals(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(cpp(source), expected);
    }

    #[rstest]
    #[case("int main() { return 0; }")]
    #[case("cout << x;")]
    #[case(r#"x << "not cout";"#)]
    #[case(r#"log << "cout"; // cout"#)]
    fn cpp_falls_back(#[case] source: &str) {
        assert_eq!(cpp(source), C_FAMILY_FALLBACK);
    }

    #[test]
    fn cpp_template_prints_greeting() {
        assert_eq!(cpp(language::LanguageId::Cpp.template()), "Hello, World!");
    }

    #[test]
    fn c_understands_printf() {
        assert_eq!(c(language::LanguageId::C.template()), "Hello, World!");
        assert_eq!(c(r#"printf("%d\n", x);"#), "%d");
        assert_eq!(c("int x;"), C_FAMILY_FALLBACK);
    }

    #[test]
    fn cpp_ignores_printf() {
        assert_eq!(cpp(r#"printf("hi\n");"#), C_FAMILY_FALLBACK);
    }
}
