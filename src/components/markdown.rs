use leptos::prelude::*;
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use std::fmt::Write;

/// Renders an assistant message body. User messages stay plain text; this is
/// only mounted for ai bubbles, which also makes the `*Generating...*`
/// placeholder show up as italics.
#[component]
pub fn MarkdownRenderer(
    #[prop(into)] content: String,
    #[prop(optional)] class: &'static str,
) -> impl IntoView {
    let rendered = Memo::new(move |_| markdown_to_html(&content));

    view! {
        <div
            class=format!("markdown-body min-w-0 max-w-full break-words {}", class)
            inner_html=move || rendered.get()
        ></div>
    }
}

pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut html = String::new();
    let mut in_code_block = false;

    for event in parser {
        match event {
            Event::Start(Tag::Paragraph) => {
                html.push_str(r#"<p class="mb-3 leading-relaxed last:mb-0">"#);
            }
            Event::End(TagEnd::Paragraph) => {
                html.push_str("</p>");
            }
            Event::Start(Tag::Heading { level, .. }) => {
                let class = match level {
                    HeadingLevel::H1 => "text-xl font-semibold mt-4 mb-2",
                    HeadingLevel::H2 => "text-lg font-semibold mt-4 mb-2",
                    _ => "text-base font-semibold mt-3 mb-1",
                };
                write!(html, r#"<h{} class="{}">"#, level as u8, class).unwrap();
            }
            Event::End(TagEnd::Heading(level)) => {
                write!(html, "</h{}>", level as u8).unwrap();
            }
            Event::Start(Tag::Emphasis) => {
                html.push_str(r#"<em class="italic">"#);
            }
            Event::End(TagEnd::Emphasis) => {
                html.push_str("</em>");
            }
            Event::Start(Tag::Strong) => {
                html.push_str(r#"<strong class="font-semibold">"#);
            }
            Event::End(TagEnd::Strong) => {
                html.push_str("</strong>");
            }
            Event::Start(Tag::Strikethrough) => {
                html.push_str(r#"<del class="line-through opacity-70">"#);
            }
            Event::End(TagEnd::Strikethrough) => {
                html.push_str("</del>");
            }
            Event::Start(Tag::Link { dest_url, title, .. }) => {
                write!(
                    html,
                    r#"<a href="{}" title="{}" class="underline text-amber-200 hover:text-amber-100" target="_blank" rel="noopener noreferrer">"#,
                    html_escape(&dest_url),
                    html_escape(&title)
                )
                .unwrap();
            }
            Event::End(TagEnd::Link) => {
                html.push_str("</a>");
            }
            Event::Start(Tag::List(None)) => {
                html.push_str(r#"<ul class="list-disc list-inside mb-3 ml-2 space-y-1">"#);
            }
            Event::Start(Tag::List(Some(_))) => {
                html.push_str(r#"<ol class="list-decimal list-inside mb-3 ml-2 space-y-1">"#);
            }
            Event::End(TagEnd::List(ordered)) => {
                html.push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            Event::Start(Tag::Item) => {
                html.push_str("<li>");
            }
            Event::End(TagEnd::Item) => {
                html.push_str("</li>");
            }
            Event::Start(Tag::BlockQuote(_)) => {
                html.push_str(
                    r#"<blockquote class="border-l-2 border-amber-200/40 pl-3 my-3 italic opacity-90">"#,
                );
            }
            Event::End(TagEnd::BlockQuote(_)) => {
                html.push_str("</blockquote>");
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                in_code_block = true;
                let lang = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => html_escape(&lang),
                    _ => "text".to_string(),
                };
                write!(
                    html,
                    r#"<pre class="bg-stone-900 rounded-lg p-4 my-3 overflow-x-auto"><code class="language-{} text-sm font-mono block whitespace-pre">"#,
                    lang
                )
                .unwrap();
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                html.push_str("</code></pre>");
            }
            Event::Code(text) => {
                write!(
                    html,
                    r#"<code class="bg-stone-800/60 px-1.5 py-0.5 rounded text-sm font-mono">{}</code>"#,
                    html_escape(&text)
                )
                .unwrap();
            }
            Event::Text(text) => {
                html.push_str(&html_escape(&text));
            }
            Event::SoftBreak => {
                html.push(if in_code_block { '\n' } else { ' ' });
            }
            Event::HardBreak => {
                if in_code_block {
                    html.push('\n');
                } else {
                    html.push_str("<br>");
                }
            }
            Event::Rule => {
                html.push_str(r#"<hr class="my-4 border-stone-600">"#);
            }
            _ => {}
        }
    }

    html
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
