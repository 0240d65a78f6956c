//! Rendering properties of whole documents

use plotmap::{parse, render, render_svg, Stylesheet, SvgConfig};
use pretty_assertions::assert_eq;

/// Extract the value of every `points="..."` attribute on polylines
fn polyline_points(svg: &str) -> Vec<String> {
    svg.lines()
        .filter(|l| l.trim_start().starts_with("<polyline"))
        .filter_map(|l| {
            let start = l.find(r#"points=""#)? + 8;
            let end = l[start..].find('"')? + start;
            Some(l[start..end].to_string())
        })
        .collect()
}

/// Text content of every element with the given class, in document order
fn texts_with_class(svg: &str, class: &str) -> Vec<String> {
    let marker = format!(r#"class="{}""#, class);
    svg.lines()
        .filter(|l| l.trim_start().starts_with("<text") && l.contains(&marker))
        .filter_map(|l| {
            let start = l.find('>')? + 1;
            let end = l.rfind("</text>")?;
            Some(l[start..end].to_string())
        })
        .collect()
}

const DRAWABLE_TAGS: [&str; 7] = [
    "<rect", "<circle", "<text", "<line", "<polygon", "<image", "<polyline",
];

fn drawable_count(svg: &str) -> usize {
    DRAWABLE_TAGS.iter().map(|t| svg.matches(t).count()).sum()
}

#[test]
fn test_single_road_example() {
    let svg = render("roads: [[{x: 0, y: 0}, {x: 10, y: 0}]]\nplots: []\nlabels: []\n").unwrap();

    assert_eq!(polyline_points(&svg), vec!["0,0 10,0".to_string()]);
    assert_eq!(drawable_count(&svg), 1);
}

#[test]
fn test_single_road_snapshot() {
    let svg = render("roads: [[{x: 0, y: 0}, {x: 10, y: 0}]]\nplots: []\nlabels: []\n").unwrap();

    insta::assert_snapshot!(svg.trim_end(), @r##"
<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="1200" height="800" viewBox="0 0 1200 800">
  <g class="roads" fill="none" stroke-linecap="round" stroke-linejoin="round">
    <polyline points="0,0 10,0" class="road" stroke="#4a4a4a" stroke-width="8"/>
  </g>
</svg>
"##);
}

#[test]
fn test_one_polyline_per_road_in_order() {
    let source = r##"
roads:
  - [[0, 0], [10, 0], [10, 10]]
  - [{x: 5, y: 5}, {x: 6, y: 7}]
  - points: [[1, 1], [2, 2], [3, 3], [4, 4]]
    color: "#cc0000"
"##;
    let svg = render(source).unwrap();
    assert_eq!(
        polyline_points(&svg),
        vec![
            "0,0 10,0 10,10".to_string(),
            "5,5 6,7".to_string(),
            "1,1 2,2 3,3 4,4".to_string(),
        ]
    );
}

#[test]
fn test_empty_plots_means_no_markers() {
    let svg = render("roads: [[[0, 0], [1, 1]]]\nplots: []\nlabels: [{text: Hi, x: 1, y: 1}]").unwrap();
    assert_eq!(svg.matches(r#"class="plot""#).count(), 0);
    assert_eq!(svg.matches(r#"class="plot-id""#).count(), 0);
}

#[test]
fn test_each_plot_gets_marker_and_id() {
    let source = r#"
plots:
  - {id: 1, name: Station, x: 100, y: 100}
  - {id: 2, x: 200, y: 100}
  - {number: 3, name: Depot, x: 300, y: 100}
"#;
    let svg = render(source).unwrap();
    assert_eq!(svg.matches(r#"class="plot""#).count(), 3);
    assert_eq!(texts_with_class(&svg, "plot-id"), vec!["1", "2", "3"]);
    assert_eq!(texts_with_class(&svg, "plot-name"), vec!["Station", "Depot"]);
}

#[test]
fn test_render_is_idempotent() {
    let source = r##"
meta: {width: 800, height: 600, background: "#fdfdfd"}
groups: [{id: a, name: Alpha, color: "#3366cc"}]
roads: [[[0, 0], [100, 0]], {points: [[0, 50], [100, 50]], width: 4}]
plots: [{id: 1, name: One, x: 10, y: 10, group: a}]
labels: [{text: Town, x: 50, y: 25, anchor: middle}]
legend: {x: 600, y: 20, items: [{group: a, label: main line}]}
key: {items: [{text: Express, color: "#ffcc00"}]}
"##;
    let first = render(source).unwrap();
    let second = render(source).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_reordering_labels_reorders_text_only() {
    let forward = r#"
roads: [[[0, 0], [9, 9]]]
labels:
  - {text: North, x: 10, y: 10}
  - {text: South, x: 10, y: 90}
  - {text: East, x: 90, y: 50}
"#;
    let reversed = r#"
roads: [[[0, 0], [9, 9]]]
labels:
  - {text: East, x: 90, y: 50}
  - {text: South, x: 10, y: 90}
  - {text: North, x: 10, y: 10}
"#;
    let a = render(forward).unwrap();
    let b = render(reversed).unwrap();

    assert_eq!(texts_with_class(&a, "label"), vec!["North", "South", "East"]);
    assert_eq!(texts_with_class(&b, "label"), vec!["East", "South", "North"]);

    let label_lines = |svg: &str| -> Vec<String> {
        svg.lines()
            .filter(|l| l.contains(r#"class="label""#))
            .map(str::to_string)
            .collect()
    };
    let other_lines = |svg: &str| -> Vec<String> {
        svg.lines()
            .filter(|l| !l.contains(r#"class="label""#))
            .map(str::to_string)
            .collect()
    };

    let mut reversed_labels = label_lines(&b);
    reversed_labels.reverse();
    assert_eq!(label_lines(&a), reversed_labels);
    assert_eq!(other_lines(&a), other_lines(&b));
}

#[test]
fn test_missing_sections_are_empty() {
    let svg = render("meta: {width: 100, height: 100}").unwrap();
    assert_eq!(drawable_count(&svg), 0);
}

#[test]
fn test_point_missing_coordinate_is_error() {
    let err = render("roads:\n  - [{x: 0, y: 0}, {x: 10}]\n").unwrap_err();
    assert!(err.to_string().contains("missing field `y`"));
}

#[test]
fn test_markup_in_text_is_escaped() {
    let svg = render(r#"labels: [{text: "<b>Fish & Chips</b>", x: 0, y: 0}]"#).unwrap();
    assert!(svg.contains("&lt;b&gt;Fish &amp; Chips&lt;/b&gt;"));
    assert!(!svg.contains("<b>"));
}

#[test]
fn test_render_svg_with_parsed_document() {
    let doc = parse("plots: [{id: 9, x: 1, y: 2}]").unwrap();
    let config = SvgConfig::default().with_background("#000000");
    let svg = render_svg(&doc, &config, &Stylesheet::default());
    assert!(svg.contains(r##"fill="#000000""##));
    assert_eq!(texts_with_class(&svg, "plot-id"), vec!["9"]);
}

#[test]
fn test_non_ascii_text_is_kept_verbatim() {
    let svg = render(
        "plots: [{id: Ä1, name: Ünterführung, x: 1, y: 2}]\n\
         labels: [{text: Café Straße, x: 0, y: 0}, {text: 東京駅, x: 5, y: 5}]\n",
    )
    .unwrap();
    assert_eq!(texts_with_class(&svg, "plot-id"), vec!["Ä1"]);
    assert_eq!(texts_with_class(&svg, "plot-name"), vec!["Ünterführung"]);
    assert_eq!(texts_with_class(&svg, "label"), vec!["Café Straße", "東京駅"]);
}

#[test]
fn test_document_background_beats_config_background() {
    let doc = parse("meta: {background: '#f0f0f0'}\nplots: [{id: 1, x: 1, y: 2}]").unwrap();
    let config = SvgConfig::default().with_background("#000000");
    let svg = render_svg(&doc, &config, &Stylesheet::default());
    assert!(svg.contains(r##"fill="#f0f0f0""##));
    assert!(!svg.contains(r##"fill="#000000""##));
}
