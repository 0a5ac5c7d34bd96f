//! A small chat-message schema: paragraphs, quotes, code blocks, mentions and
//! emoji, with emphasis, strong and code marks.

use crate::model::{MarkSpec, Node, NodeSpec, Schema};
use crate::spec::OutputSpec;

pub const EMOJI_PNG_FOLDER: &str = "./static/emoji/png/";

/// Shortname to code point (hex), for the emoji the bundled image set carries.
///
/// Deliberately partial: any other shortname renders through the
/// `:grey_question:` fallback with a warning.
const EMOJI: &[(&str, &str)] = &[
    (":grey_question:", "2754"),
    (":heart:", "2764"),
    (":joy:", "1f602"),
    (":smile:", "1f604"),
    (":thumbsup:", "1f44d"),
    (":wave:", "1f44b"),
];

pub fn emoji_unicode(shortname: &str) -> Option<&'static str> {
    EMOJI
        .iter()
        .find(|(name, _)| *name == shortname)
        .map(|(_, unicode)| *unicode)
}

pub fn chat_schema() -> Schema {
    Schema::builder()
        .node("doc", NodeSpec::new().content("block+"))
        .node(
            "paragraph",
            NodeSpec::new()
                .content("inline*")
                .to_output_spec(|_| OutputSpec::element("p").hole()),
        )
        .node(
            "blockquote",
            NodeSpec::new()
                .content("block+")
                .to_output_spec(|_| OutputSpec::element("blockquote").hole()),
        )
        .node(
            "code_block",
            NodeSpec::new()
                .content("text*")
                .to_output_spec(|_| OutputSpec::element("pre").child(OutputSpec::element("code").hole())),
        )
        .node("text", NodeSpec::new())
        .node(
            "hard_break",
            NodeSpec::new()
                .inline()
                .to_output_spec(|_| OutputSpec::element("br")),
        )
        .node("mention", NodeSpec::new().inline().to_output_spec(mention_spec))
        .node("emoji", NodeSpec::new().inline().to_output_spec(emoji_spec))
        .mark("em", MarkSpec::new().to_output_spec(|_, _| OutputSpec::element("em")))
        .mark(
            "strong",
            MarkSpec::new().to_output_spec(|_, _| OutputSpec::element("strong")),
        )
        .mark("code", MarkSpec::new().to_output_spec(|_, _| OutputSpec::element("code")))
        .build()
}

fn mention_spec(node: &Node) -> OutputSpec {
    let username = node.attr_str("username").unwrap_or_default();
    OutputSpec::element("span")
        .attr("class", "mention clickable")
        .attr("data-username", username)
        .attr("onclick", format!("openContact(\"{username}\")"))
        .child(format!("@{username}"))
}

fn emoji_spec(node: &Node) -> OutputSpec {
    let shortname = node.attr_str("shortname").unwrap_or_default();
    let Some(unicode) = emoji_unicode(shortname) else {
        log::warn!("emoji data not found for {shortname}");
        return OutputSpec::element("img")
            .attr("class", "emojione")
            .attr("alt", ":grey_question:")
            .attr("title", "\u{2754}")
            .attr("src", format!("{EMOJI_PNG_FOLDER}2754.png"));
    };

    let alt = u32::from_str_radix(unicode, 16)
        .ok()
        .and_then(char::from_u32)
        .map(String::from)
        .unwrap_or_else(|| shortname.to_string());
    OutputSpec::element("img")
        .attr("class", "emojione")
        .attr("alt", alt)
        .attr("title", shortname)
        .attr("src", format!("{EMOJI_PNG_FOLDER}{unicode}.png"))
}
