//! Binary cache contract tests: text-parse -> write -> read reproduces the label.

use std::fs::File;
use std::io::{BufReader, BufWriter, Seek, SeekFrom, Write};

use cb_cont_label::{
    decode_label, encode_label, label_tokens, read_label, write_label, CacheReader, CacheWriter,
    EvalLabel, Label, LabelCodec, LabelError,
};

const LINES: &[&str] = &[
    "shared | user=alice",
    "1:0.5:0.25 2 | a",
    "left:1.0:0.5 right:-1:0.5 | b c",
    "x:2:1.5 y:3:-0.3 | d",
    "shared:1:0.5 | e",
    "| no label",
];

fn parsed() -> Vec<Label> {
    LINES
        .iter()
        .map(|line| Label::parse(&label_tokens(line)).unwrap())
        .collect()
}

#[test]
fn test_each_parsed_label_roundtrips() {
    for label in parsed() {
        let mut buf = Vec::new();
        let written = write_label(&mut buf, &label).unwrap();
        assert_eq!(written, 8 + 16 * label.len());

        let mut back = Label::new();
        let read = read_label(&mut buf.as_slice(), &mut back).unwrap();
        assert_eq!(read, written);
        assert_eq!(back, label);
        assert_eq!(back.is_test(), label.is_test());
        assert_eq!(back.is_header(), label.is_header());

        assert_eq!(decode_label(&encode_label(&label)).unwrap(), (label, written));
    }
}

#[test]
fn test_scratch_field_is_carried() {
    let mut label = Label::parse(&["a:1:0.5", "b:2:0.5"]).unwrap();
    label.costs[1].partial_prediction = -4.25;

    let bytes = encode_label(&label);
    let (back, _) = decode_label(&bytes).unwrap();
    assert_eq!(back.costs[1].partial_prediction, -4.25);

    let mut copy = Label::new();
    copy.copy_from(&back);
    assert_eq!(copy.costs[1].partial_prediction, -4.25);
}

#[test]
fn test_cache_file_roundtrip() {
    let labels = parsed();
    let mut file = tempfile::tempfile().unwrap();
    {
        let mut writer = CacheWriter::new(BufWriter::new(&mut file));
        for label in &labels {
            writer.write(label).unwrap();
        }
        writer.finish().unwrap();
    }
    file.seek(SeekFrom::Start(0)).unwrap();

    let back: Vec<Label> = CacheReader::<_, Label>::new(BufReader::new(&mut file))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(back, labels);
}

#[test]
fn test_eval_cache_file_roundtrip() {
    let labels: Vec<EvalLabel> = ["act 1:0.5:0.25", "17 shared", "other a b:1:1"]
        .iter()
        .map(|line| EvalLabel::parse(&label_tokens(line)).unwrap())
        .collect();

    let mut writer = CacheWriter::new(Vec::new());
    for label in &labels {
        writer.write(label).unwrap();
    }
    let expected_bytes: usize = labels.iter().map(EvalLabel::encoded_len).sum();
    assert_eq!(writer.bytes_written(), expected_bytes as u64);
    let bytes = writer.finish().unwrap();

    let mut reader = CacheReader::<_, EvalLabel>::new(bytes.as_slice());
    let mut label = EvalLabel::new();
    let mut back = Vec::new();
    while reader.read_into(&mut label).unwrap() {
        back.push(label.clone());
    }
    assert_eq!(back, labels);
    assert_eq!(reader.bytes_read(), expected_bytes as u64);
}

#[test]
fn test_truncated_records_clear_target() {
    let label = Label::parse(&["a:1:0.5", "b:2:0.25", "c"]).unwrap();
    let bytes = encode_label(&label);

    for cut in [0, 1, 7, 8, 9, 23, 24, bytes.len() - 1] {
        let mut target = Label::parse(&["stale:1:1"]).unwrap();
        let err = read_label(&mut &bytes[..cut], &mut target).unwrap_err();
        assert!(
            matches!(err, LabelError::TruncatedCache { .. }),
            "cut at {cut}: {err}"
        );
        assert!(target.is_empty(), "cut at {cut} left entries behind");
    }
}

#[test]
fn test_truncated_file_is_reported_after_good_records() {
    let labels = parsed();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for label in &labels {
        label.write_cache(&mut file).unwrap();
    }
    file.write_all(&[3, 0, 0, 0, 0, 0, 0, 0, 1, 2]).unwrap();
    file.flush().unwrap();

    let reader = CacheReader::<_, Label>::new(BufReader::new(File::open(file.path()).unwrap()));
    let results: Vec<_> = reader.collect();
    assert_eq!(results.len(), labels.len() + 1);
    for (got, want) in results.iter().zip(&labels) {
        assert_eq!(got.as_ref().unwrap(), want);
    }
    let last = results.last().unwrap();
    assert!(matches!(
        last,
        Err(LabelError::TruncatedCache {
            needed: 56,
            got: 10
        })
    ));
}
