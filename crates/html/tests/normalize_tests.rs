// ABOUTME: Integration tests for the fragment normalizer.
// ABOUTME: Covers the documented scenarios plus idempotence and output invariants over sample posts.

use postkit_html::{
    audit_fragment, normalize_fragment, parse_fragment, Node, NormalizeOptions, Normalizer,
    SrcCollapse,
};
use pretty_assertions::assert_eq;

/// Fragments shaped like real CMS exports.
const SAMPLES: &[&str] = &[
    r#"<!--c--><p></p><h1>Title</h1><p>Body</p><img src="a/../b/x.png" style="color:red">"#,
    r#"<h4>Intro</h4><p style="margin:0">Text</p><h5>Detail</h5><h3>Back up</h3>"#,
    r#"<div class="author-info"><img src="../images/me.jpg"><p>By Jane</p></div>
<p>&nbsp;</p>
<p><img src="posts/slug/../images/photo.jpg" class="wide" style="width:100%"></p>
<p>Caf&eacute; &amp; more <a href="/x?a=1&amp;b=2">link</a></p>"#,
    r#"<h2>Already</h2><p>clean <em>text</em></p><img src="x.png" class="article-image">"#,
    r#"<p>Watch:</p><p><iframe src="https://www.youtube.com/embed/x" style="border:0" allowfullscreen></iframe></p><p><!-- gone --></p>"#,
    r#"<ul><li>one<li>two</ul><p>unclosed <b>bold <i>both</b> tail"#,
    "<pre>\n\ncode</pre>",
    "<p>x</p><pre>\n\n  indented</pre><textarea>\n\nnotes</textarea><listing>\n\nl</listing>",
    r##"<svg><use xlink:href="#icon"></use></svg>"##,
    "just some plain text & no markup",
    "",
];

#[test]
fn documented_scenario_full_cleanup() {
    let input =
        r#"<!--c--><p></p><h1>Title</h1><p>Body</p><img src="a/../b/x.png" style="color:red">"#;
    assert_eq!(
        normalize_fragment(input),
        r#"<h2>Title</h2><p>Body</p><img src="x.png" class="article-image">"#
    );
}

#[test]
fn documented_scenario_heading_shift() {
    let output = normalize_fragment("<h4>A</h4><h5>B</h5><h3>C</h3>");
    assert_eq!(output, "<h2>A</h2><h3>B</h3><h2>C</h2>");
}

#[test]
fn documented_scenario_image_only_paragraph_kept() {
    let output = normalize_fragment(r#"<p><img src="photo.jpg" style="width:50%" alt="P"></p>"#);
    assert_eq!(
        output,
        r#"<p><img src="photo.jpg" alt="P" class="article-image"></p>"#
    );
}

#[test]
fn preformatted_leading_newline_survives() {
    assert_eq!(normalize_fragment("<pre>\n\ncode</pre>"), "<pre>\n\ncode</pre>");
    assert_eq!(
        normalize_fragment("<textarea>\n\nnotes</textarea>"),
        "<textarea>\n\nnotes</textarea>"
    );
}

#[test]
fn svg_link_prefix_survives() {
    let input = r##"<svg><use xlink:href="#icon"></use></svg>"##;
    assert_eq!(normalize_fragment(input), input);
}

#[test]
fn normalization_is_idempotent() {
    for sample in SAMPLES {
        let once = normalize_fragment(sample);
        let twice = normalize_fragment(&once);
        assert_eq!(once, twice, "not idempotent for input: {sample}");
    }
}

#[test]
fn second_run_reports_no_change() {
    let normalizer = Normalizer::default();
    for sample in SAMPLES {
        let once = normalizer.normalize(sample);
        let again = normalizer.normalize(&once.html);
        assert!(!again.report.changed, "second run changed: {sample}");
        assert_eq!(again.report.edits(), 0, "second run edited: {sample}");
    }
}

#[test]
fn output_satisfies_invariants() {
    let opts = NormalizeOptions::default();
    for sample in SAMPLES {
        let output = normalize_fragment(sample);
        let audit = audit_fragment(&output, &opts);

        assert_eq!(audit.comments, 0, "comment survived: {output}");
        assert_eq!(audit.empty_paragraphs, 0, "empty paragraph survived: {output}");
        assert!(!audit.has_h1(), "h1 survived: {output}");
        assert_eq!(audit.styled_targets, 0, "style survived: {output}");
        assert_eq!(audit.author_blocks, 0, "author block survived: {output}");
        assert_eq!(audit.images_missing_class, 0, "image without class: {output}");
        assert!(audit.is_clean(), "not clean: {output}");
    }
}

#[test]
fn image_class_appears_exactly_once() {
    let output = normalize_fragment(
        r#"<img src="a.png" class="article-image big article-image"><img src="b.png" class="big">"#,
    );
    let fragment = parse_fragment(&output);
    for node in &fragment.children {
        let img = node.as_element().expect("image element");
        let count = img.classes().filter(|c| *c == "article-image").count();
        assert_eq!(count, 1, "class list: {:?}", img.attr("class"));
        assert!(img.attr("style").is_none());
    }
    assert_eq!(
        output,
        r#"<img src="a.png" class="article-image big"><img src="b.png" class="big article-image">"#
    );
}

#[test]
fn author_block_removal_can_empty_a_paragraph() {
    let output = normalize_fragment(r#"<p><span class="author-info">Jane</span></p><p>Body</p>"#);
    assert_eq!(output, "<p>Body</p>");
}

#[test]
fn sibling_order_is_preserved() {
    let output = normalize_fragment("<p>1</p><!--x--><p>2</p><p></p><p>3</p>");
    assert_eq!(output, "<p>1</p><p>2</p><p>3</p>");
}

#[test]
fn plain_text_is_returned_verbatim() {
    let text = "Tom & Jerry < Itchy";
    assert_eq!(normalize_fragment(text), text);
}

#[test]
fn malformed_markup_does_not_panic() {
    let inputs = [
        "<p><div></p></div>",
        "<<<>>>",
        "<img src=\"a/../",
        "</h1>stray close",
        "<!-- unterminated comment",
        "<table><p>misnested</table>",
    ];
    for input in inputs {
        let once = normalize_fragment(input);
        assert_eq!(once, normalize_fragment(&once), "input: {input}");
    }
}

#[test]
fn remainder_mode_keeps_directories() {
    let normalizer = Normalizer::builder()
        .src_collapse(SrcCollapse::Remainder)
        .build();
    let result = normalizer.normalize(r#"<img src="posts/slug/../images/photo.jpg">"#);
    assert_eq!(
        result.html,
        r#"<img src="images/photo.jpg" class="article-image">"#
    );
}

#[test]
fn custom_class_names() {
    let normalizer = Normalizer::builder()
        .image_class("post-img")
        .author_class("byline")
        .build();
    let result = normalizer.normalize(r#"<div class="byline">x</div><img src="a.png">"#);
    assert_eq!(result.html, r#"<img src="a.png" class="post-img">"#);
    assert_eq!(normalizer.options().image_class, "post-img");
}

#[test]
fn comments_never_reach_the_tree() {
    let output = normalize_fragment("<div><!--a--><p>x<!--b--></p></div><!--c-->");
    let fragment = parse_fragment(&output);
    fn has_comment(nodes: &[Node]) -> bool {
        nodes.iter().any(|n| match n {
            Node::Comment(_) => true,
            Node::Element(el) => has_comment(&el.children),
            Node::Text(_) => false,
        })
    }
    assert!(!has_comment(&fragment.children));
}
