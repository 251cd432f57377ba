//! Cosmetic normalization of generated script text.
//!
//! Upstream emitters write one construct per line without caring about
//! indentation. This pass re-indents by bracket nesting, trims trailing
//! whitespace, collapses runs of blank lines and drops blank lines that
//! directly follow an opening line or precede a closing one.

/// An open bracket and the indentation level of the line that opened it.
struct Open {
    bracket: char,
    level: usize,
}

/// Re-indents `text` with `width` spaces per nesting level.
pub fn normalize(text: &str, width: usize) -> String {
    let mut stack: Vec<Open> = Vec::new();
    let mut lines: Vec<String> = Vec::new();
    let mut pending_blank = false;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            pending_blank = !lines.is_empty();
            continue;
        }

        let leading = line.chars().take_while(|c| is_closer(*c)).count();
        let starts_with_closer = leading > 0;
        let mut level = stack.last().map_or(0, |o| o.level + 1);
        for c in line.chars().take(leading) {
            if let Some(open) = pop_matching(&mut stack, c) {
                level = open.level;
            }
        }

        let after_opener = lines.last().is_some_and(|prev| ends_with_opener(prev));
        if pending_blank && !starts_with_closer && !after_opener {
            lines.push(String::new());
        }
        pending_blank = false;

        lines.push(format!("{}{}", " ".repeat(level * width), line));
        scan_brackets(&line[leading..], level, &mut stack);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn is_closer(c: char) -> bool {
    matches!(c, '}' | ')' | ']')
}

fn opener_for(closer: char) -> char {
    match closer {
        '}' => '{',
        ')' => '(',
        _ => '[',
    }
}

fn ends_with_opener(line: &str) -> bool {
    line.trim_end().ends_with(['{', '(', '['])
}

/// Pops the innermost bracket if it matches `closer`; unbalanced input is tolerated.
fn pop_matching(stack: &mut Vec<Open>, closer: char) -> Option<Open> {
    match stack.last() {
        Some(top) if top.bracket == opener_for(closer) => stack.pop(),
        _ => None,
    }
}

/// Tracks brackets outside of string literals.
fn scan_brackets(line: &str, level: usize, stack: &mut Vec<Open>) {
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in line.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '{' | '(' | '[' => stack.push(Open { bracket: c, level }),
            c if is_closer(c) => {
                pop_matching(stack, c);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indents_by_opening_line_not_by_bracket() {
        let input = "k6.group('a', function () {\nconst r = http.get('x', {\ntimeout: '1s',\n})\n})\n";
        let expected = "k6.group('a', function () {\n  const r = http.get('x', {\n    timeout: '1s',\n  })\n})\n";
        assert_eq!(normalize(input, 2), expected);
    }

    #[test]
    fn hugging_closers_return_to_opener_level() {
        let input = "const r = http.post('u', {\na: 'b',\n}, {\nheaders: {},\n})";
        let expected = "const r = http.post('u', {\n  a: 'b',\n}, {\n  headers: {},\n})\n";
        assert_eq!(normalize(input, 2), expected);
    }

    #[test]
    fn brackets_inside_strings_are_ignored() {
        let input = "x = '{(['\nnext";
        assert_eq!(normalize(input, 4), "x = '{(['\nnext\n");
    }

    #[test]
    fn blank_lines_are_collapsed_and_trimmed() {
        let input = "\n\n   a   \n\n\n\nb {\n\nc\n\n}\n\n";
        assert_eq!(normalize(input, 2), "a\n\nb {\n  c\n}\n");
    }

    #[test]
    fn is_idempotent() {
        let input = "export function setup() {\nconst variables = {}\nreturn variables\n}\n\nexport default function (variables) {\n}";
        let once = normalize(input, 2);
        assert_eq!(normalize(&once, 2), once);
    }
}
