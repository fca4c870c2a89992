use super::*;

#[test]
fn assignment_is_positional_and_deterministic() {
    let palette = Palette::default();
    let a = assign(3, &palette).unwrap();
    let b = assign(3, &palette).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 3);
    for (i, color) in a.iter().enumerate() {
        assert_eq!(Some(*color), palette.get(i));
    }
}

#[test]
fn equal_count_succeeds_no_off_by_one() {
    let palette = Palette::default();
    assert_eq!(palette.capacity(), 7);
    let colors = assign(7, &palette).unwrap();
    assert_eq!(colors.len(), 7);
}

#[test]
fn one_past_capacity_is_exhausted() {
    let palette = Palette::default();
    match assign(8, &palette) {
        Err(VelomapError::PaletteExhausted { datasets, capacity }) => {
            assert_eq!(datasets, 8);
            assert_eq!(capacity, 7);
        }
        other => panic!("expected PaletteExhausted, got {other:?}"),
    }
}

#[test]
fn zero_datasets_is_fine() {
    assert!(assign(0, &Palette::default()).unwrap().is_empty());
}

#[test]
fn custom_palette_capacity_is_honored() {
    let palette = Palette::new(vec![Color("red"), Color("blue")]);
    assert!(assign(2, &palette).is_ok());
    assert!(assign(3, &palette).is_err());
}
