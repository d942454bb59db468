use pad_core::parse;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn texts(bytes: &[u8]) -> Vec<String> {
    parse(bytes).store.lines().map(|l| l.to_string()).collect()
}

#[test]
fn test_scenario_lines() {
    assert_eq!(texts(b"ab\ncd\n"), ["ab", "cd"]);
    assert_eq!(texts(b"ab\ncd"), ["ab", "cd"]);
    assert_eq!(parse(b"").line_count(), 0);
}

#[test]
fn test_line_count_matches_terminators() {
    let samples: [&[u8]; 7] = [b"a", b"a\n", b"\n", b"\n\n\n", b"a\nb", b"a\n\nb\n", b"x\ny\nz"];
    for sample in samples {
        let terminators = sample.iter().filter(|&&b| b == b'\n').count();
        let expected = terminators + usize::from(!sample.ends_with(b"\n"));
        assert_eq!(parse(sample).line_count(), expected, "input {sample:?}");
    }
}

#[test]
fn test_each_line_is_the_text_between_terminators() {
    let input = "first\n\tsecond\n\nfourth 你好\nlast";
    let output = parse(input.as_bytes());
    for (i, expected) in input.split('\n').enumerate() {
        assert_eq!(output.store.get_line(i).to_string(), expected);
    }
}

#[test]
fn test_carriage_returns_stay_in_their_lines() {
    assert_eq!(texts(b"a\r\nb\r\n"), ["a\r", "b\r"]);
    assert_eq!(texts(b"a\r\nb\n"), ["a\r", "b"]);
    assert_eq!(texts(b"\r\n"), ["\r"]);

    let output = parse(b"a\r\nb\r\n");
    assert_eq!(output.store.to_bytes(), b"a\r\nb\r\n");
}

#[test]
fn test_reads_past_end_are_empty_and_do_not_mutate() {
    let output = parse(b"a\nb\n");
    for index in [2, 3, 100, usize::MAX] {
        assert!(output.store.get_line(index).is_empty());
    }
    assert_eq!(output.line_count(), 2);
    assert_eq!(output.store.to_bytes(), b"a\nb\n");
}

#[test]
fn test_round_trip_random_ascii() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let alphabet = b"ab \t\r\n";

    for _ in 0..500 {
        let len = rng.gen_range(0..40);
        let bytes: Vec<u8> = (0..len)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
            .collect();

        let output = parse(&bytes);
        let saved = output.store.to_bytes();

        if bytes.is_empty() || bytes.ends_with(b"\n") {
            assert_eq!(saved, bytes);
        } else {
            let mut expected = bytes.clone();
            expected.push(b'\n');
            assert_eq!(saved, expected);
        }
    }
}

#[test]
fn test_invalid_bytes_do_not_shift_other_lines() {
    let output = parse(b"ok\n\xc3\x28bad\nstill ok\n");
    assert_eq!(output.store.get_line(0).to_string(), "ok");
    assert_eq!(output.store.get_line(1).to_string(), "\u{FFFD}(bad");
    assert_eq!(output.store.get_line(2).to_string(), "still ok");
    assert_eq!(output.replaced_sequences, 1);
}
