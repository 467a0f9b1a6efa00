//! Attribute, data, style and content accessors

use domops::dom::DomError;
use domops::{Access, AccessArg, Accessed, Dom, Error};

const LIST: &str = r#"
<style>
  ul { color: red }
  .warn { color: orange !important }
  #intro { margin-top: 4px }
</style>
<p id="intro" style="font-size: 20px">Intro <b>text</b></p>
<ul>
  <li data-id="1">one</li>
  <li data-id="2" class="warn" style="color: blue">two</li>
  <li>three</li>
</ul>
"#;

fn page() -> Dom {
    Dom::parse(LIST).unwrap()
}

#[test]
fn test_attr_get_and_set() {
    let dom = page();
    let items = dom.query("li").unwrap();
    assert_eq!(
        items.attr("data-id"),
        vec![Some("1".to_string()), Some("2".to_string()), None]
    );

    items.set_attr("title", "item").unwrap();
    assert_eq!(items.attr("title"), vec![Some("item".to_string()); 3]);

    items
        .set_attrs([("role", "listitem"), ("title", "again")])
        .unwrap();
    assert_eq!(items.attr("role")[2].as_deref(), Some("listitem"));
    assert_eq!(items.attr("title")[0].as_deref(), Some("again"));
}

#[test]
fn test_set_attr_on_text_node_aborts() {
    let dom = page();
    let (p, text) = dom.read(|doc| {
        let tree = doc.tree();
        let p = doc.get_element_by_id("intro").unwrap();
        (p, tree.first_child(p).unwrap())
    });
    let mixed = dom.select([p, text]);
    assert!(matches!(
        mixed.set_attr("lang", "en"),
        Err(Error::Dom(DomError::InvalidNodeType(_)))
    ));
    // no rollback: the element before the failure keeps its change
    assert_eq!(dom.select([p]).attr("lang"), vec![Some("en".to_string())]);
}

#[test]
fn test_data_prefixes_names() {
    let dom = page();
    let items = dom.query("li").unwrap();
    assert_eq!(items.data("id")[1].as_deref(), Some("2"));

    items.set_data("state", "open").unwrap();
    assert_eq!(items.attr("data-state")[0].as_deref(), Some("open"));

    items.set_data_many([("a", "x"), ("b", "y")]).unwrap();
    assert_eq!(items.data("b")[2].as_deref(), Some("y"));
}

#[test]
fn test_computed_style() {
    let dom = page();
    let items = dom.query("li").unwrap();
    assert_eq!(items.style("color"), vec!["red", "orange", "red"]);
    assert_eq!(items.style("display"), vec!["list-item"; 3]);

    let intro = dom.query("#intro").unwrap();
    assert_eq!(intro.style("marginTop"), vec!["4px"]);
    assert_eq!(intro.style("font-size"), vec!["20px"]);

    intro.set_style("marginTop", "8px").unwrap();
    assert_eq!(intro.style("margin-top"), vec!["8px"]);
    assert_eq!(
        intro.attr("style"),
        vec![Some("font-size: 20px; margin-top: 8px;".to_string())]
    );
}

#[test]
fn test_access_dispatch() {
    let dom = page();
    let items = dom.query("li").unwrap();

    let get = Access::from_args(&[AccessArg::from("id")]).unwrap();
    let values = items.data_access(get).unwrap().values().unwrap();
    assert_eq!(values[0].as_deref(), Some("1"));

    let set = Access::from_args(&["class".into(), "done".into()]).unwrap();
    let chained = items.attr_access(set).unwrap();
    assert!(matches!(chained, Accessed::Selection(s) if s.len() == 3));
    assert_eq!(items.has_class("done"), vec![true; 3]);

    let many: &[(&str, &str)] = &[("color", "green")];
    items
        .style_access(Access::from_args(&[many.into()]).unwrap())
        .unwrap();
    // the class rule is !important and still wins on the second item
    assert_eq!(items.style("color"), vec!["green", "orange", "green"]);

    assert!(matches!(
        Access::from_args(&[]),
        Err(Error::Argument(_))
    ));
}

#[test]
fn test_text_and_html() {
    let dom = page();
    let intro = dom.query("#intro").unwrap();
    assert_eq!(intro.text(), vec!["Intro text"]);
    assert_eq!(intro.html(), vec!["Intro <b>text</b>"]);

    intro.set_text("<b>plain</b>").unwrap();
    assert_eq!(intro.html(), vec!["&lt;b&gt;plain&lt;/b&gt;"]);

    intro.set_html("new <em>markup</em> &amp; more").unwrap();
    assert_eq!(intro.text(), vec!["new markup & more"]);
    assert_eq!(dom.query("#intro em").unwrap().len(), 1);

    let items = dom.query("li").unwrap();
    items
        .set_html_with(|_, i, all| format!("<i>{}/{}</i>", i + 1, all.len()))
        .unwrap();
    assert_eq!(items.text(), vec!["1/3", "2/3", "3/3"]);
}
