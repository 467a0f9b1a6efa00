//! Example: query and edit a small page

use std::time::Duration;

use domops::{BoxOptions, Dom, on_ready};
use tracing_subscriber::EnvFilter;

const PAGE: &str = r#"
<div id="header"><h1>Welcome</h1></div>
<ul id="todo">
  <li data-priority="high">write docs</li>
  <li>fix the build</li>
</ul>
"#;

fn main() -> anyhow::Result<()> {
    // Initialize logging, e.g. RUST_LOG=domops=debug
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("domops v{}", domops::VERSION);

    let dom = Dom::parse(PAGE)?;
    on_ready(|| println!("document ready"));
    dom.content_loaded();

    let items = dom.query("#todo li")?;
    println!("items: {:?}", items.text());
    println!("priority: {:?}", items.data("priority"));

    items.add_class(&["task"])?.set_style("color", "gray")?;
    let extra = dom.create("li");
    extra.set_text("ship it")?.attach_to(&dom.query("#todo")?)?;

    let tasks = dom.query("li.task, li:last-child")?;
    for (text, bounds) in tasks.text().into_iter().zip(tasks.bounds(BoxOptions::default())?) {
        println!("{text:>14} at {bounds:?}");
    }
    println!("{}", dom.query("#todo")?.html()[0]);

    smol::block_on(domops::delay(Duration::from_millis(10)));
    Ok(())
}
