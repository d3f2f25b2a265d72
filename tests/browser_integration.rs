use flerovium::dom::{ScriptTableLookup, find_table_at};
use flerovium::prediction::{TableLocator, resolve_table};
use flerovium::{
    BrowserSession, LaunchOptions, CellTextNormalizer, MarkerOverlay, PageDriver, TableBox, TargetCoordinate,
};

const TABLE_PAGE: &str = "data:text/html,<html><body style='margin:0'>\
    <table id='customers' class='ws-table-all' style='width:400px'>\
    <tr><th>Company</th><th>Contact</th><th>Country</th></tr>\
    <tr><td>Alfreds Futterkiste</td><td>Maria Anders</td><td>Germany</td></tr>\
    <tr><td>Ernst Handel</td><td>Roland Mendel</td><td>Austria</td></tr>\
    </table></body></html>";

fn open(url: &str) -> BrowserSession {
    let session = BrowserSession::launch(LaunchOptions::new().headless(true)).expect("Failed to launch browser");
    session.navigate(url).expect("Failed to navigate");
    session.wait_for_ready().expect("Page never became ready");
    session
}

fn marker_count(session: &BrowserSession) -> u64 {
    session
        .evaluate("document.querySelectorAll('[data-flerovium-marker]').length")
        .expect("Failed to count markers")
        .and_then(|v| v.as_u64())
        .unwrap_or(0)
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_find_table_at_point() {
    let session = open(TABLE_PAGE);

    let found = find_table_at(&session, TargetCoordinate::new(20.0, 30.0))
        .expect("Table lookup failed")
        .expect("No table under point");

    assert_eq!(found.tag_name, "table");
    assert_eq!(found.id.as_deref(), Some("customers"));
    assert!(found.outer_html.contains("Ernst Handel"));
    assert_eq!(found.cells[0], vec!["Company", "Contact", "Country"]);
    assert_eq!(found.cells[2], vec!["Ernst Handel", "Roland Mendel", "Austria"]);

    let outside = find_table_at(&session, TargetCoordinate::new(900.0, 700.0)).expect("Table lookup failed");
    assert!(outside.is_none());
}

#[test]
#[ignore]
fn test_resolve_table_against_live_dom() {
    let session = open(TABLE_PAGE);
    let lookup = ScriptTableLookup::new(&session);
    let boxes = vec![TableBox::new(900.0, 700.0, 0.3), TableBox::new(50.0, 30.0, 0.8)];

    let table = resolve_table(&boxes, &lookup, &CellTextNormalizer).expect("Failed to resolve table");

    assert_eq!(table.locator, TableLocator::Id("customers".to_string()));
    assert_eq!(table.normalized_rows.column("Country"), vec!["Germany", "Austria"]);
}

#[test]
#[ignore]
fn test_cell_text_ignores_markup() {
    let session = open(
        "data:text/html,<html><body style='margin:0'><table id='links' style='width:400px'>\
         <tr><th>Company</th><th>Site</th></tr>\
         <tr><td><a href='https://a.example'>Alfreds</a></td><td><b>Germany</b></td></tr>\
         <tr><td>a|b</td><td>1</td></tr>\
         <tr><td>Line1<br>Line2</td><td><em>  spaced  </em></td></tr>\
         </table></body></html>",
    );
    let lookup = ScriptTableLookup::new(&session);

    let table = resolve_table(&[TableBox::new(20.0, 10.0, 0.9)], &lookup, &CellTextNormalizer)
        .expect("Failed to resolve table");
    let rows = &table.normalized_rows;

    assert_eq!(rows.headers, vec!["Company", "Site"]);
    assert_eq!(rows.column("Company"), vec!["Alfreds", "a|b", "Line1 Line2"]);
    assert_eq!(rows.column("Site"), vec!["Germany", "1", "spaced"]);
}

#[test]
#[ignore]
fn test_markers_are_placed_and_cleared() {
    let session = open("data:text/html,<html><body><p>markers</p></body></html>");
    let mut overlay = MarkerOverlay::new();

    let first = overlay.mark(&session, TargetCoordinate::new(10.0, 10.0), "red").expect("Failed to mark");
    overlay.mark(&session, TargetCoordinate::new(50.0, 50.0), "rgba(0, 0, 255, 0.5)").expect("Failed to mark");
    assert_eq!(marker_count(&session), 2);

    assert_eq!(overlay.unmark(&session, &first), 1);
    assert_eq!(marker_count(&session), 1);

    assert_eq!(overlay.unmark_all(&session), 1);
    assert_eq!(overlay.unmark_all(&session), 0);
    assert_eq!(marker_count(&session), 0);
}

#[test]
#[ignore]
fn test_click_at_and_type() {
    let session = open(
        "data:text/html,<html><body style='margin:0'>\
         <input id='name' style='position:absolute;left:0;top:0;width:200px;height:40px'>\
         </body></html>",
    );

    session.click_at(TargetCoordinate::new(100.0, 20.0)).expect("Failed to click");
    session.type_text("hi", std::time::Duration::from_millis(10)).expect("Failed to type");

    let value = session
        .evaluate("document.getElementById('name').value")
        .expect("Failed to read input")
        .and_then(|v| v.as_str().map(str::to_string));
    assert_eq!(value.as_deref(), Some("hi"));
}

#[test]
#[ignore]
fn test_screenshot_is_png() {
    let session = open(TABLE_PAGE);
    let png = session.capture_screenshot().expect("Failed to capture");

    let image = image::load_from_memory(&png).expect("Screenshot is not an image");
    assert!(image.width() > 0 && image.height() > 0);
}
