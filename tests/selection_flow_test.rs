use grow_and_go::{Selection, parse};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn value(selection: &Selection, column: &str) -> Option<String> {
    selection
        .card()
        .and_then(|c| c.get(column))
        .map(str::to_string)
}

#[test]
fn documented_parse_examples() {
    let two = parse("a,b\n1,2\n\n3,4");
    assert_eq!(two.len(), 2);
    assert_eq!(two.get(1).unwrap().get("a"), Some("3"));

    let quoted = parse("a,b\n\"1,1\",2");
    assert_eq!(quoted.get(0).unwrap().get("a"), Some("1,1"));
    assert_eq!(quoted.get(0).unwrap().get("b"), Some("2"));

    assert!(parse("a,b\n1,2,3").is_empty());
}

#[test]
fn parse_then_shuffle_and_flip() {
    let dataset = parse(
        "topic,detail\n\
         Joy,laugh\n\
         Rest,sleep\n\
         Joy,dance\n\
         Growth,habit",
    );
    let mut rng = StdRng::seed_from_u64(2024);

    let mut selection = Selection::default();
    for _ in 0..100 {
        let next = selection.select_next(&dataset, &mut rng);
        // Without a Concept column the first column identifies the card.
        assert_ne!(value(&selection, "topic"), value(&next, "topic"));

        let flipped = next.toggle_flip().toggle_flip();
        assert_eq!(flipped, next);
        selection = next;
    }
}
