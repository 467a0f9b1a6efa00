//! Layout-backed geometry reads

use domops::{BoxOptions, Config, CssBox, Dom};

const LAYOUT: &str = r#"
<div id="banner" style="height: 60px"></div>
<div id="panel" style="position: relative; width: 400px; height: 300px; margin-left: 20px">
  <div id="full" style="height: 50px"></div>
  <div id="corner" style="position: absolute; right: 10px; bottom: 10px; width: 40px; height: 30px"></div>
</div>
<div id="fixed" style="position: fixed; top: 5px; left: 6px; width: 10px; height: 10px"></div>
<div id="gone" style="display: none"><p id="inside">hidden</p></div>
"#;

fn page() -> Dom {
    Dom::parse(LAYOUT).unwrap()
}

#[test]
fn test_top_left_element_bounds() {
    let dom = page();
    let banner = dom.query("#banner").unwrap();
    let absolute = banner.bounds(BoxOptions { absolute: true }).unwrap();
    assert_eq!(absolute, vec![[0.0, 0.0, 1280.0, 60.0]]);
    assert_eq!(banner.location().unwrap(), vec![[0.0, 0.0]]);
}

#[test]
fn test_relative_and_absolute_bounds_differ() {
    let dom = page();
    let corner = dom.query("#corner").unwrap();

    assert_eq!(
        corner.bounds(BoxOptions::default()).unwrap(),
        vec![[350.0, 260.0, 390.0, 290.0]]
    );
    assert_eq!(
        corner.bounds(BoxOptions { absolute: true }).unwrap(),
        vec![[370.0, 320.0, 410.0, 350.0]]
    );
}

#[test]
fn test_css_box_of_full_width_child() {
    let dom = page();
    let full = dom.query("#full").unwrap().css_box().unwrap();
    assert_eq!(
        full,
        vec![CssBox {
            top: 0.0,
            left: 0.0,
            right: 0.0,
            bottom: 250.0
        }]
    );

    // right/bottom are distances here, coordinates in bounds()
    let corner = dom.query("#corner").unwrap().css_box().unwrap()[0];
    assert_eq!((corner.right, corner.bottom), (10.0, 10.0));
}

#[test]
fn test_sizes() {
    let dom = page();
    let all = dom.query("#panel, #fixed, #gone, #inside").unwrap();
    assert_eq!(
        all.size().unwrap(),
        vec![[400.0, 300.0], [10.0, 10.0], [0.0, 0.0], [0.0, 0.0]]
    );
    assert_eq!(dom.query("#fixed").unwrap().location().unwrap(), vec![[6.0, 5.0]]);
}

#[test]
fn test_viewport_from_config() {
    let config = Config {
        viewport_width: 800.0,
        ..Config::default()
    };
    let dom = Dom::parse_with_config(LAYOUT, config).unwrap();
    assert_eq!(dom.query("#banner").unwrap().size().unwrap(), vec![[800.0, 60.0]]);
}

#[test]
fn test_detached_elements_measure_zero() {
    let dom = page();
    let panel = dom.query("#panel").unwrap();
    panel.detach().unwrap();
    assert_eq!(panel.size().unwrap(), vec![[0.0, 0.0]]);
    assert_eq!(panel.location().unwrap(), vec![[0.0, 0.0]]);

    let created = dom.create("div");
    assert_eq!(created.bounds(BoxOptions::default()).unwrap(), vec![[0.0; 4]]);
}
