use std::sync::LazyLock;

use regex::Regex;

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("static pattern"));

fn escape_html(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			_ => out.push(c),
		}
	}
	out
}

/// Model text to presentational markup: `**bold**` spans and line breaks, nothing else.
pub fn render_markup(text: &str) -> String {
	let escaped = escape_html(text);
	BOLD.replace_all(&escaped, "<strong>$1</strong>")
		.replace('\n', "<br/>")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bold_and_line_breaks() {
		assert_eq!(render_markup("**56 Md€**"), "<strong>56 Md€</strong>");
		assert_eq!(
			render_markup("La **TVA** rapporte\n**100 Md€**."),
			"La <strong>TVA</strong> rapporte<br/><strong>100 Md€</strong>."
		);
	}

	#[test]
	fn bold_does_not_span_lines() {
		assert_eq!(render_markup("**a\nb**"), "**a<br/>b**");
	}

	#[test]
	fn other_markdown_is_left_alone() {
		assert_eq!(render_markup("# Titre\n- *point*"), "# Titre<br/>- *point*");
	}

	#[test]
	fn raw_html_is_escaped() {
		assert_eq!(
			render_markup("<script>x</script> & **<b>**"),
			"&lt;script&gt;x&lt;/script&gt; &amp; <strong>&lt;b&gt;</strong>"
		);
	}
}
