// ABOUTME: Integration tests for the free-text meal line parser
// ABOUTME: Covers unit conversion, cooking methods, explicit calories and explicit macros
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 KBJU Diary Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::float_cmp)]
#![allow(missing_docs)]

use kbju_diary::models::{CookingMethod, MacroBreakdown, QuantityUnit};
use kbju_diary::parser::{first_positive_number, parse_line};

#[test]
fn test_chicken_breast_boiled_grams() {
    let parsed = parse_line("chicken breast boiled 140 g");

    assert_eq!(parsed.title, "chicken breast");
    assert_eq!(parsed.cooking_method, Some(CookingMethod::Boiled));
    assert_eq!(parsed.quantity_value, Some(140.0));
    assert_eq!(parsed.quantity_unit, Some(QuantityUnit::Grams));
    assert_eq!(parsed.mass_grams, Some(140.0));
    assert_eq!(parsed.explicit_kcal, None);
    assert!(!parsed.is_calories_only);
}

#[test]
fn test_protein_bar_calories_only() {
    let parsed = parse_line("protein bar 180 kcal");

    assert_eq!(parsed.title, "protein bar");
    assert!(parsed.is_calories_only);
    assert_eq!(parsed.explicit_kcal, Some(180.0));
    assert_eq!(parsed.mass_grams, None);
    assert_eq!(parsed.quantity_unit, None);
    assert!(parsed.is_fully_resolvable());
}

#[test]
fn test_unit_conversion_table() {
    let cases = [
        ("сахар 15 г", QuantityUnit::Grams, 15.0, Some(15.0)),
        ("картофель 1,5 кг", QuantityUnit::Kilograms, 1.5, Some(1500.0)),
        ("молоко 250 мл", QuantityUnit::Milliliters, 250.0, Some(250.0)),
        ("кефир 0.5 л", QuantityUnit::Liters, 0.5, Some(500.0)),
        ("яйцо 2 шт", QuantityUnit::Pieces, 2.0, None),
        ("apple 2 pcs", QuantityUnit::Pieces, 2.0, None),
    ];

    for (line, unit, value, grams) in cases {
        let parsed = parse_line(line);
        assert_eq!(parsed.quantity_unit, Some(unit), "unit for {line}");
        assert_eq!(parsed.quantity_value, Some(value), "value for {line}");
        assert_eq!(parsed.mass_grams, grams, "mass for {line}");
    }
}

#[test]
fn test_russian_methods_are_stripped() {
    let parsed = parse_line("Гречка отварная 200 гр");
    assert_eq!(parsed.title, "гречка");
    assert_eq!(parsed.cooking_method, Some(CookingMethod::Boiled));
    assert_eq!(parsed.mass_grams, Some(200.0));

    let parsed = parse_line("курица на гриле 150г");
    assert_eq!(parsed.title, "курица");
    assert_eq!(parsed.cooking_method, Some(CookingMethod::Grilled));

    let parsed = parse_line("картофель жареный 120 г");
    assert_eq!(parsed.title, "картофель");
    assert_eq!(parsed.cooking_method, Some(CookingMethod::Fried));
}

#[test]
fn test_no_quantity_leaves_mass_unknown() {
    let parsed = parse_line("куриная грудка");
    assert_eq!(parsed.title, "куриная грудка");
    assert_eq!(parsed.quantity_value, None);
    assert!(!parsed.has_known_mass());
    assert!(!parsed.is_fully_resolvable());
}

#[test]
fn test_russian_calories() {
    let parsed = parse_line("шоколадка 250 ккал");
    assert_eq!(parsed.title, "шоколадка");
    assert_eq!(parsed.explicit_kcal, Some(250.0));
    assert!(parsed.is_calories_only);
}

#[test]
fn test_quantity_and_calories_together() {
    let parsed = parse_line("сырники 150 г 320 ккал");
    assert_eq!(parsed.title, "сырники");
    assert_eq!(parsed.mass_grams, Some(150.0));
    assert_eq!(parsed.explicit_kcal, Some(320.0));
}

#[test]
fn test_explicit_macros_with_mass_are_fully_resolvable() {
    let parsed = parse_line("творог 200 г б 18 ж 5 у 3");
    assert_eq!(parsed.title, "творог");
    assert_eq!(
        parsed.explicit_macros,
        Some(MacroBreakdown {
            protein: 18.0,
            fat: 5.0,
            carbs: 3.0,
        })
    );
    assert!(parsed.is_fully_resolvable());

    let latin = parse_line("skyr 150 g p 11 f 0,2 c 4");
    assert_eq!(latin.title, "skyr");
    assert_eq!(latin.explicit_macros.map(|m| m.fat), Some(0.2));
}

#[test]
fn test_macros_without_mass_are_not_enough() {
    let parsed = parse_line("творог б 18 ж 5 у 3");
    assert!(parsed.explicit_macros.is_some());
    assert!(!parsed.is_fully_resolvable());
}

#[test]
fn test_first_number_wins() {
    let parsed = parse_line("рис 100 г и ещё 50 г");
    assert_eq!(parsed.mass_grams, Some(100.0));
}

#[test]
fn test_parsing_never_fails() {
    for line in ["", "   ", "!!!", "100", "г"] {
        let parsed = parse_line(line);
        assert!(parsed.explicit_kcal.is_none(), "{line:?}");
    }
    assert_eq!(parse_line("").title, "");
}

#[test]
fn test_first_positive_number() {
    assert_eq!(first_positive_number("140"), Some(140.0));
    assert_eq!(first_positive_number("примерно 95,5 г"), Some(95.5));
    assert_eq!(first_positive_number("не знаю"), None);
    assert_eq!(first_positive_number("0"), None);
    assert_eq!(first_positive_number("-20"), None);
}
