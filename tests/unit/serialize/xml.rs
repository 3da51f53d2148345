use super::*;

#[test]
fn pretty_output_uses_two_space_indent() {
    let root = XmlElement::new("a")
        .attr("version", "1.13")
        .child(XmlElement::new("b").child(XmlElement::new("c").attr("x", "1")));
    let out = write_pretty(&root).unwrap();
    assert_eq!(out, "<a version=\"1.13\">\n  <b>\n    <c x=\"1\"/>\n  </b>\n</a>");
}

#[test]
fn absent_optional_attributes_are_omitted() {
    let el = XmlElement::new("format")
        .attr("id", "r1")
        .opt_attr("name", None::<String>)
        .opt_attr("colorSpace", Some("1-13-1"));
    assert_eq!(write_pretty(&el).unwrap(), "<format id=\"r1\" colorSpace=\"1-13-1\"/>");
}

#[test]
fn text_and_attributes_are_escaped_and_parsed_back() {
    let el = XmlElement::new("text-style")
        .attr("ref", "ts1")
        .text("Tom & \"Jerry\" <3");
    let out = write_pretty(&el).unwrap();
    assert!(out.contains("&amp;"));
    let back = parse(&out).unwrap();
    assert_eq!(back.text.as_deref(), Some("Tom & \"Jerry\" <3"));
    assert_eq!(back.get("ref"), Some("ts1"));
}

#[test]
fn parse_skips_declaration_and_doctype() {
    let xml = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE fcpxml>\n<fcpxml version=\"1.13\"><resources/></fcpxml>";
    let root = parse(xml).unwrap();
    assert_eq!(root.name, "fcpxml");
    assert_eq!(root.children_named("resources").count(), 1);
}

#[test]
fn parse_reports_malformed_input() {
    assert!(parse("").is_err());
    assert!(parse("<a><b></a>").is_err());
    assert!(parse("<a>").is_err());
    assert!(parse("<a/><b/>").is_err());
    assert!(parse("<a x=\"1\" x=\"2\"/>").is_err());
}

#[test]
fn walk_visits_every_element() {
    let root = XmlElement::new("a").children([
        XmlElement::new("b").child(XmlElement::new("c")),
        XmlElement::new("d"),
    ]);
    let mut names = Vec::new();
    root.walk(&mut |e| names.push(e.name.clone()));
    assert_eq!(names, ["a", "b", "c", "d"]);
}
