use super::*;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn dish(id: &str, price: &str) -> CartDish {
    CartDish {
        dish_id: id.to_string(),
        name: format!("Dish {}", id),
        price: dec(price),
        image: None,
    }
}

#[test]
fn add_item_merges_lines_per_dish() {
    let mut cart = Cart::new(Decimal::ZERO);
    let d = dish("a", "38.00");

    cart.add_item(&d);
    cart.add_item(&d);
    cart.add_item(&dish("b", "12.50"));

    assert_eq!(cart.lines().len(), 2);
    assert_eq!(cart.lines()[0].quantity, 2);
    assert_eq!(cart.subtotal(), dec("88.50"));
}

#[test]
fn remove_item_drops_whole_line() {
    let mut cart = Cart::new(Decimal::ZERO);
    let d = dish("a", "10.00");
    cart.add_item(&d);
    cart.add_item(&d);

    cart.remove_item("a");

    assert!(cart.is_empty());
    assert_eq!(cart.subtotal(), Decimal::ZERO);
}

#[test]
fn update_quantity_clamps_at_zero_and_removes_line() {
    let mut cart = Cart::new(Decimal::ZERO);
    cart.add_item(&dish("a", "10.00"));

    cart.update_quantity("a", 3);
    assert_eq!(cart.lines()[0].quantity, 4);

    cart.update_quantity("a", -10);
    assert!(cart.is_empty());
}

#[test]
fn totals_track_any_mutation_sequence() {
    let mut cart = Cart::new(Decimal::ZERO);
    cart.add_item(&dish("a", "38.00"));
    cart.add_item(&dish("b", "12.00"));
    cart.update_quantity("a", 2); // a ×3
    cart.update_quantity("b", -1); // b removed
    cart.add_item(&dish("c", "5.50"));

    let expected: Decimal = cart.lines().iter().map(|l| l.line_total()).sum();
    assert_eq!(cart.subtotal(), expected);
    assert_eq!(cart.subtotal(), dec("119.50"));
    assert!(cart.lines().iter().all(|l| l.quantity > 0));
}

#[test]
fn tax_applies_to_subtotal() {
    let mut cart = Cart::new(dec("0.10"));
    cart.add_item(&dish("a", "100.00"));

    assert_eq!(cart.subtotal(), dec("100.00"));
    assert_eq!(cart.tax(), dec("10.0000"));
    assert_eq!(cart.total(), dec("110.0000"));
}

#[test]
fn zero_tax_rate_means_total_equals_subtotal() {
    let mut cart = Cart::new(Decimal::ZERO);
    cart.add_item(&dish("a", "99.90"));
    assert_eq!(cart.total(), cart.subtotal());
}

#[test]
fn clear_resets_lines_and_notes() {
    let mut cart = Cart::new(Decimal::ZERO);
    cart.add_item(&dish("a", "10.00"));
    cart.set_notes("a", "no onions");
    cart.set_order_notes("rush");

    cart.clear();

    assert!(cart.is_empty());
    assert_eq!(cart.order_notes(), "");
}

#[test]
fn notes_are_free_text() {
    let mut cart = Cart::new(Decimal::ZERO);
    cart.add_item(&dish("a", "10.00"));
    cart.set_notes("a", "少辣 🌶");
    cart.set_order_notes("打包");

    assert_eq!(cart.lines()[0].notes.as_deref(), Some("少辣 🌶"));
    assert_eq!(cart.order_notes(), "打包");
}

#[test]
fn converts_to_order_create_request() {
    let mut cart = Cart::new(Decimal::ZERO);
    cart.add_item(&dish("dish:a", "10.00"));
    cart.add_item(&dish("dish:a", "10.00"));
    cart.set_notes("dish:a", "extra sauce");
    cart.set_order_notes("window seat");

    let req = cart.to_order_create("dining_table:t1", None);

    assert_eq!(req.table_id, "dining_table:t1");
    assert_eq!(req.items.len(), 1);
    assert_eq!(req.items[0].quantity, 2);
    assert_eq!(req.items[0].notes.as_deref(), Some("extra sauce"));
    assert_eq!(req.notes.as_deref(), Some("window seat"));
}
