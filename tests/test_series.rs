// Series pipeline tests
// Author: Gabriel Demetrios Lafis

use rust_frame_pipeline_engine::{PipelineError, Record, Series, Value};

/// Build a value vector from integers
fn int_values(values: &[i64]) -> Vec<Value> {
    values.iter().map(|i| Value::Integer(*i)).collect()
}

#[test]
fn test_get_index_of_auto_indexed_series() {
    let series = Series::new(int_values(&[100, 200]));

    let indexes = series.get_index().to_values().unwrap();

    assert_eq!(indexes, int_values(&[0, 1]));
}

#[test]
fn test_skip_preserves_explicit_index() {
    let series = Series::with_index(int_values(&[100, 300, 200, 5]), int_values(&[0, 1, 2, 3]));

    let pairs = series.skip(2).to_pairs().unwrap();

    assert_eq!(pairs, vec![
        (Value::Integer(2), Value::Integer(200)),
        (Value::Integer(3), Value::Integer(5)),
    ]);
}

#[test]
fn test_take_head_and_tail() {
    let series = Series::new(int_values(&[1, 2, 3, 4, 5]));

    assert_eq!(series.take(2).to_values().unwrap(), int_values(&[1, 2]));
    assert_eq!(series.head(3).to_values().unwrap(), int_values(&[1, 2, 3]));
    assert_eq!(series.tail(2).to_values().unwrap(), int_values(&[4, 5]));

    // Tail keeps the source index
    let pairs = series.tail(1).to_pairs().unwrap();
    assert_eq!(pairs, vec![(Value::Integer(4), Value::Integer(5))]);
}

#[test]
fn test_skip_while_and_take_while() {
    let series = Series::new(int_values(&[2, 4, 5, 6, 1]));

    let skipped = series.skip_while(|value, _| {
        matches!(value, Value::Integer(i) if i % 2 == 0)
    });
    assert_eq!(skipped.to_values().unwrap(), int_values(&[5, 6, 1]));

    let taken = series.take_while(|value, _| {
        matches!(value, Value::Integer(i) if i % 2 == 0)
    });
    assert_eq!(taken.to_values().unwrap(), int_values(&[2, 4]));

    let until = series.skip_until(|value, _| *value == Value::Integer(5));
    assert_eq!(until.to_values().unwrap(), int_values(&[5, 6, 1]));

    let taken_until = series.take_until(|value, _| *value == Value::Integer(5));
    assert_eq!(taken_until.to_values().unwrap(), int_values(&[2, 4]));
}

#[test]
fn test_slice_by_index_range() {
    let series = Series::with_index(
        int_values(&[10, 20, 30, 40, 50]),
        int_values(&[0, 1, 2, 3, 4]),
    );

    let sliced = series.slice(Value::Integer(1), Value::Integer(4));

    assert_eq!(sliced.to_pairs().unwrap(), vec![
        (Value::Integer(1), Value::Integer(20)),
        (Value::Integer(2), Value::Integer(30)),
        (Value::Integer(3), Value::Integer(40)),
    ]);
}

#[test]
fn test_filter_and_select() {
    let series = Series::new(int_values(&[1, 2, 3, 4]));

    let result = series
        .filter(|value, _| matches!(value, Value::Integer(i) if i % 2 == 0))
        .select(|value, _| match value {
            Value::Integer(i) => Value::Integer(i * 10),
            other => other.clone(),
        });

    let pairs = result.to_pairs().unwrap();

    // Filtering keeps the source index; selection leaves it unchanged
    assert_eq!(pairs, vec![
        (Value::Integer(1), Value::Integer(20)),
        (Value::Integer(3), Value::Integer(40)),
    ]);
}

#[test]
fn test_select_pairs_rewrites_the_index() {
    let series = Series::new(int_values(&[5, 6]));

    let result = series.select_pairs(|value, index| {
        let shifted = match index {
            Value::Integer(i) => Value::Integer(i + 100),
            other => other.clone(),
        };
        (shifted, value.clone())
    });

    assert_eq!(result.to_pairs().unwrap(), vec![
        (Value::Integer(100), Value::Integer(5)),
        (Value::Integer(101), Value::Integer(6)),
    ]);
}

#[test]
fn test_select_many_flattens_with_parent_index() {
    let series = Series::new(int_values(&[1, 2]));

    let result = series.select_many(|value, _| match value {
        Value::Integer(i) => Value::Array(vec![
            Value::Integer(*i),
            Value::Integer(i * 10),
        ]),
        other => other.clone(),
    });

    assert_eq!(result.to_pairs().unwrap(), vec![
        (Value::Integer(0), Value::Integer(1)),
        (Value::Integer(0), Value::Integer(10)),
        (Value::Integer(1), Value::Integer(2)),
        (Value::Integer(1), Value::Integer(20)),
    ]);
}

#[test]
fn test_select_many_rejects_non_collection_producers() {
    let series = Series::new(int_values(&[1]));

    let result = series.select_many(|value, _| value.clone()).to_values();

    match result {
        Err(PipelineError::ProducerShape(_)) => {},
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_select_many_pairs_takes_pairs_verbatim() {
    let series = Series::new(int_values(&[1]));

    let result = series.select_many_pairs(|value, _| {
        Value::Array(vec![
            Value::Array(vec![Value::Integer(7), value.clone()]),
            Value::Array(vec![Value::Integer(8), value.clone()]),
        ])
    });

    assert_eq!(result.to_pairs().unwrap(), vec![
        (Value::Integer(7), Value::Integer(1)),
        (Value::Integer(8), Value::Integer(1)),
    ]);
}

#[test]
fn test_zip_adopts_first_index() {
    let left = Series::with_index(int_values(&[1, 2]), int_values(&[10, 11]));
    let right = Series::with_index(int_values(&[100, 200, 300]), int_values(&[90, 91, 92]));

    let zipped = left.zip_with(&[right], |values| {
        let total: i64 = values
            .iter()
            .map(|v| match v {
                Value::Integer(i) => *i,
                _ => 0,
            })
            .sum();
        Value::Integer(total)
    });

    // Terminates at the shorter input, keeping the first input's index
    assert_eq!(zipped.to_pairs().unwrap(), vec![
        (Value::Integer(10), Value::Integer(101)),
        (Value::Integer(11), Value::Integer(202)),
    ]);
}

#[test]
fn test_restart_law_two_consumptions_are_identical() {
    let series = Series::new(int_values(&[3, 1, 2]))
        .filter(|value, _| !matches!(value, Value::Integer(1)))
        .select(|value, _| match value {
            Value::Integer(i) => Value::Integer(i + 1),
            other => other.clone(),
        });

    let first = series.to_pairs().unwrap();
    let second = series.to_pairs().unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_reverse_involution() {
    let series = Series::new(int_values(&[1, 2, 3]));

    let double_reversed = series.reverse().reverse();

    assert_eq!(
        double_reversed.to_pairs().unwrap(),
        series.to_pairs().unwrap()
    );
}

#[test]
fn test_concat_is_associative() {
    let a = Series::new(int_values(&[1]));
    let b = Series::new(int_values(&[2]));
    let c = Series::new(int_values(&[3]));

    let left = a.concat(&b).concat(&c);
    let right = a.concat(&b.concat(&c));

    assert_eq!(left.to_pairs().unwrap(), right.to_pairs().unwrap());
}

#[test]
fn test_order_by_is_stable_and_then_by_refines() {
    // Pairs of (group, rank) encoded as group * 10 + rank
    let series = Series::new(int_values(&[21, 11, 22, 12, 23]));

    let by_group = series.order_by(|value, _| match value {
        Value::Integer(i) => Value::Integer(i / 10),
        other => other.clone(),
    });

    // Equal keys keep source order
    assert_eq!(
        by_group.to_values().unwrap(),
        int_values(&[11, 12, 21, 22, 23])
    );

    let refined = by_group.then_by_descending(|value, _| match value {
        Value::Integer(i) => Value::Integer(i % 10),
        other => other.clone(),
    });

    assert_eq!(
        refined.to_values().unwrap(),
        int_values(&[12, 11, 23, 22, 21])
    );

    // The previous pipeline is untouched by then_by
    assert_eq!(
        by_group.to_values().unwrap(),
        int_values(&[11, 12, 21, 22, 23])
    );
}

#[test]
fn test_window_splits_into_fixed_chunks() {
    let series = Series::new(int_values(&[1, 2, 3, 4]));

    let windows = series.window(2).to_pairs().unwrap();

    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0].0, Value::Integer(0));
    assert_eq!(windows[1].0, Value::Integer(1));

    match &windows[0].1 {
        Value::Series(window) => {
            assert_eq!(window.to_pairs().unwrap(), vec![
                (Value::Integer(0), Value::Integer(1)),
                (Value::Integer(1), Value::Integer(2)),
            ]);
        },
        other => panic!("unexpected window value: {:?}", other),
    }

    match &windows[1].1 {
        Value::Series(window) => {
            assert_eq!(window.to_pairs().unwrap(), vec![
                (Value::Integer(2), Value::Integer(3)),
                (Value::Integer(3), Value::Integer(4)),
            ]);
        },
        other => panic!("unexpected window value: {:?}", other),
    }
}

#[test]
fn test_window_emits_short_final_chunk() {
    let series = Series::new(int_values(&[1, 2, 3]));

    let windows = series.window(2).to_pairs().unwrap();

    assert_eq!(windows.len(), 2);

    match &windows[1].1 {
        Value::Series(window) => {
            assert_eq!(window.to_values().unwrap(), int_values(&[3]));
        },
        other => panic!("unexpected window value: {:?}", other),
    }
}

#[test]
fn test_rolling_window_steps_by_one() {
    let series = Series::new(int_values(&[1, 2, 3]));

    let windows = series.rolling_window(2).to_pairs().unwrap();

    assert_eq!(windows.len(), 2);

    match &windows[0].1 {
        Value::Series(window) => {
            assert_eq!(window.to_values().unwrap(), int_values(&[1, 2]));
        },
        other => panic!("unexpected window value: {:?}", other),
    }

    // Shorter input than the period emits nothing
    let empty = Series::new(int_values(&[1])).rolling_window(2);
    assert_eq!(empty.to_pairs().unwrap().len(), 0);
}

#[test]
fn test_variable_window_breaks_on_comparer() {
    let series = Series::new(int_values(&[1, 1, 2, 3, 3, 3]));

    let windows = series.variable_window(|a, b| a == b).to_pairs().unwrap();

    assert_eq!(windows.len(), 3);

    let lengths: Vec<usize> = windows
        .iter()
        .map(|(_, window)| match window {
            Value::Series(window) => window.count().unwrap(),
            _ => 0,
        })
        .collect();

    assert_eq!(lengths, vec![2, 1, 3]);
}

#[test]
fn test_percent_change_between_adjacent_values() {
    let series = Series::new(int_values(&[1, 2, 4, 8]));

    let changes = series.percent_change().to_pairs().unwrap();

    assert_eq!(changes, vec![
        (Value::Integer(1), Value::Float(1.0)),
        (Value::Integer(2), Value::Float(1.0)),
        (Value::Integer(3), Value::Float(1.0)),
    ]);
}

#[test]
fn test_amount_change_between_adjacent_values() {
    let series = Series::new(int_values(&[1, 4, 2]));

    let changes = series.amount_change().to_values().unwrap();

    assert_eq!(changes, int_values(&[3, -2]));
}

#[test]
fn test_aggregations() {
    let series = Series::new(int_values(&[3, 1, 2]));

    assert_eq!(series.count().unwrap(), 3);
    assert_eq!(series.sum().unwrap(), Value::Integer(6));
    assert_eq!(series.average().unwrap(), Value::Float(2.0));
    assert_eq!(series.min().unwrap(), Value::Integer(1));
    assert_eq!(series.max().unwrap(), Value::Integer(3));

    let total = series
        .aggregate(Value::Integer(10), |acc, value| match (acc, value) {
            (Value::Integer(a), Value::Integer(b)) => Value::Integer(a + b),
            (acc, _) => acc.clone(),
        })
        .unwrap();
    assert_eq!(total, Value::Integer(16));

    let reduced = series
        .reduce(|acc, value| match (acc, value) {
            (Value::Integer(a), Value::Integer(b)) => Value::Integer(*a.max(b)),
            (acc, _) => acc.clone(),
        })
        .unwrap();
    assert_eq!(reduced, Value::Integer(3));
}

#[test]
fn test_aggregating_an_empty_series() {
    let series = Series::empty();

    assert_eq!(series.sum().unwrap(), Value::Integer(0));
    assert_eq!(series.average().unwrap(), Value::Integer(0));

    match series.min() {
        Err(PipelineError::EmptySequence(_)) => {},
        other => panic!("unexpected result: {:?}", other),
    }

    match series.reduce(|acc, _| acc.clone()) {
        Err(PipelineError::EmptySequence(_)) => {},
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_first_and_last() {
    let series = Series::new(int_values(&[7, 8, 9]));

    assert_eq!(series.first().unwrap(), Value::Integer(7));
    assert_eq!(series.last().unwrap(), Value::Integer(9));
    assert_eq!(
        series.first_pair().unwrap(),
        (Value::Integer(0), Value::Integer(7))
    );

    match Series::empty().first() {
        Err(PipelineError::EmptySequence(_)) => {},
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_at_contains_and_quantifiers() {
    let series = Series::with_index(int_values(&[10, 20]), int_values(&[5, 6]));

    assert_eq!(series.at(&Value::Integer(6)).unwrap(), Value::Integer(20));
    assert_eq!(series.at(&Value::Integer(9)).unwrap(), Value::Absent);

    assert!(series.contains(&Value::Integer(10)).unwrap());
    assert!(!series.contains(&Value::Integer(11)).unwrap());

    assert!(series.all(|value, _| matches!(value, Value::Integer(_))).unwrap());
    assert!(series.any().unwrap());
    assert!(series.any_where(|value, _| *value == Value::Integer(20)).unwrap());
    assert!(series.none_where(|value, _| *value == Value::Integer(99)).unwrap());

    // An empty series never satisfies all
    assert!(!Series::empty().all(|_, _| true).unwrap());
    assert!(Series::empty().none().unwrap());
}

#[test]
fn test_insert_and_append_pairs() {
    let series = Series::new(int_values(&[2]));

    let grown = series
        .insert_pair((Value::Integer(-1), Value::Integer(1)))
        .append_pair((Value::Integer(99), Value::Integer(3)));

    assert_eq!(grown.to_pairs().unwrap(), vec![
        (Value::Integer(-1), Value::Integer(1)),
        (Value::Integer(0), Value::Integer(2)),
        (Value::Integer(99), Value::Integer(3)),
    ]);
}

#[test]
fn test_distinct_keeps_first_occurrence() {
    let series = Series::new(int_values(&[1, 2, 1, 3, 2]));

    let distinct = series.distinct();

    assert_eq!(distinct.to_values().unwrap(), int_values(&[1, 2, 3]));

    // First occurrences keep their original index
    assert_eq!(
        distinct.get_index().to_values().unwrap(),
        int_values(&[0, 1, 3])
    );
}

#[test]
fn test_distinct_treats_records_as_unordered_mappings() {
    let first = Record::new()
        .with("a", Value::Integer(1))
        .with("b", Value::Integer(2));
    let second = Record::new()
        .with("b", Value::Integer(2))
        .with("a", Value::Integer(1));

    // Records compare as mappings, so insertion order is irrelevant
    assert_eq!(first, second);

    let series = Series::new(vec![Value::Record(first), Value::Record(second)]);

    assert_eq!(series.distinct().count().unwrap(), 1);
}

#[test]
fn test_sequential_distinct_collapses_runs_only() {
    let series = Series::new(int_values(&[1, 1, 2, 2, 1]));

    let collapsed = series.sequential_distinct();

    assert_eq!(collapsed.to_values().unwrap(), int_values(&[1, 2, 1]));
}

#[test]
fn test_group_by_keys_and_members() {
    let series = Series::new(int_values(&[1, 2, 3, 4]));

    let groups = series
        .group_by(|value, _| match value {
            Value::Integer(i) => Value::Integer(i % 2),
            other => other.clone(),
        })
        .to_pairs()
        .unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].0, Value::Integer(1));
    assert_eq!(groups[1].0, Value::Integer(0));

    match &groups[0].1 {
        Value::Series(members) => {
            assert_eq!(members.to_values().unwrap(), int_values(&[1, 3]));
        },
        other => panic!("unexpected group value: {:?}", other),
    }
}

#[test]
fn test_set_operations() {
    let left = Series::new(int_values(&[1, 2, 3]));
    let right = Series::new(int_values(&[2, 3, 4]));

    assert_eq!(
        left.union(&right).to_values().unwrap(),
        int_values(&[1, 2, 3, 4])
    );
    assert_eq!(
        left.intersection(&right).to_values().unwrap(),
        int_values(&[2, 3])
    );
    assert_eq!(
        left.except(&right).to_values().unwrap(),
        int_values(&[1])
    );
}

#[test]
fn test_inner_join_produces_a_frame() {
    let left = Series::new(int_values(&[1, 2, 3]));
    let right = Series::new(int_values(&[2, 3, 4]));

    let joined = left.join(
        &right,
        |value| value.clone(),
        |value| value.clone(),
        |outer, inner| {
            Value::Record(
                Record::new()
                    .with("left", outer.clone())
                    .with("right", inner.clone()),
            )
        },
    );

    assert_eq!(joined.column_names().unwrap(), vec!["left", "right"]);

    let rows = joined.to_rows().unwrap();
    assert_eq!(rows, vec![
        vec![Value::Integer(2), Value::Integer(2)],
        vec![Value::Integer(3), Value::Integer(3)],
    ]);

    // The join index is reset to 0 .. n-1
    assert_eq!(
        joined.get_index().to_values().unwrap(),
        int_values(&[0, 1])
    );
}

#[test]
fn test_full_outer_join_passes_absent_to_missing_sides() {
    let left = Series::new(int_values(&[1, 2]));
    let right = Series::new(int_values(&[2, 3]));

    let joined = left.join_outer(
        &right,
        |value| value.clone(),
        |value| value.clone(),
        |outer, inner| {
            Value::Record(
                Record::new()
                    .with("left", outer.clone())
                    .with("right", inner.clone()),
            )
        },
    );

    let rows = joined.to_rows().unwrap();

    assert_eq!(rows, vec![
        vec![Value::Integer(1), Value::Absent],
        vec![Value::Integer(2), Value::Integer(2)],
        vec![Value::Absent, Value::Integer(3)],
    ]);
}

#[test]
fn test_one_sided_outer_joins() {
    let left = Series::new(int_values(&[1, 2]));
    let right = Series::new(int_values(&[2, 3]));

    fn combine(outer: &Value, inner: &Value) -> Value {
        Value::Record(
            Record::new()
                .with("left", outer.clone())
                .with("right", inner.clone()),
        )
    }

    let left_join = left.join_outer_left(
        &right,
        |value| value.clone(),
        |value| value.clone(),
        combine,
    );
    assert_eq!(left_join.to_rows().unwrap(), vec![
        vec![Value::Integer(1), Value::Absent],
        vec![Value::Integer(2), Value::Integer(2)],
    ]);

    let right_join = left.join_outer_right(
        &right,
        |value| value.clone(),
        |value| value.clone(),
        combine,
    );
    assert_eq!(right_join.to_rows().unwrap(), vec![
        vec![Value::Integer(2), Value::Integer(2)],
        vec![Value::Absent, Value::Integer(3)],
    ]);
}

#[test]
fn test_fill_gaps_between_adjacent_pairs() {
    let series = Series::from_pairs(vec![
        (Value::Integer(0), Value::Integer(1)),
        (Value::Integer(2), Value::Integer(3)),
    ]);

    let filled = series.fill_gaps(
        |a, b| match (&a.0, &b.0) {
            (Value::Integer(x), Value::Integer(y)) => y - x > 1,
            _ => false,
        },
        |a, _| match &a.0 {
            Value::Integer(x) => vec![(Value::Integer(x + 1), Value::Integer(2))],
            _ => Vec::new(),
        },
    );

    assert_eq!(filled.to_pairs().unwrap(), vec![
        (Value::Integer(0), Value::Integer(1)),
        (Value::Integer(1), Value::Integer(2)),
        (Value::Integer(2), Value::Integer(3)),
    ]);
}

#[test]
fn test_reindex_left_joins_onto_new_index() {
    let series = Series::with_index(int_values(&[10, 20, 30]), int_values(&[0, 1, 2]));

    let reindexed = series.reindex(int_values(&[2, 3]));

    assert_eq!(reindexed.to_pairs().unwrap(), vec![
        (Value::Integer(2), Value::Integer(30)),
    ]);
    assert_eq!(reindexed.count().unwrap(), 2);
}

#[test]
fn test_reindex_rejects_duplicate_source_indexes() {
    let series = Series::with_index(int_values(&[10, 20]), int_values(&[0, 0]));

    let result = series.reindex(int_values(&[0])).to_pairs();

    match result {
        Err(PipelineError::DuplicateIndex(_)) => {},
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_reset_index_and_set_index() {
    let series = Series::with_index(int_values(&[10, 20]), int_values(&[7, 8]));

    assert_eq!(
        series.reset_index().get_index().to_values().unwrap(),
        int_values(&[0, 1])
    );

    let rebased = series.set_index(int_values(&[100, 101]));
    assert_eq!(rebased.to_pairs().unwrap(), vec![
        (Value::Integer(100), Value::Integer(10)),
        (Value::Integer(101), Value::Integer(20)),
    ]);
}

#[test]
fn test_index_from_another_series_uses_its_values() {
    let index_series = Series::new(int_values(&[50, 60]));
    let series = Series::with_index(int_values(&[1, 2]), &index_series);

    assert_eq!(series.to_pairs().unwrap(), vec![
        (Value::Integer(50), Value::Integer(1)),
        (Value::Integer(60), Value::Integer(2)),
    ]);
}

#[test]
fn test_parse_ints() {
    let series = Series::new(vec![
        Value::String("1".to_string()),
        Value::String("100".to_string()),
        Value::String("5".to_string()),
    ]);

    assert_eq!(
        series.parse_ints().to_values().unwrap(),
        int_values(&[1, 100, 5])
    );
}

#[test]
fn test_parse_ints_drops_empty_strings_as_absent() {
    let series = Series::new(vec![
        Value::String("1".to_string()),
        Value::String("".to_string()),
        Value::String("5".to_string()),
    ]);

    assert_eq!(
        series.parse_ints().to_values().unwrap(),
        int_values(&[1, 5])
    );
}

#[test]
fn test_parse_ints_rejects_non_strings_on_evaluation() {
    let series = Series::new(int_values(&[1]));
    let parsed = series.parse_ints();

    match parsed.to_values() {
        Err(PipelineError::TypeMismatch(_)) => {},
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_parse_floats() {
    let series = Series::new(vec![
        Value::String("1.5".to_string()),
        Value::String("2".to_string()),
    ]);

    assert_eq!(
        series.parse_floats().to_values().unwrap(),
        vec![Value::Float(1.5), Value::Float(2.0)]
    );
}

#[test]
fn test_parse_dates_and_format_back() {
    let series = Series::new(vec![Value::String("2020-01-02".to_string())]);

    let dates = series.parse_dates("%Y-%m-%d");
    let formatted = dates.to_strings(Some("%Y-%m-%d"));

    assert_eq!(
        formatted.to_values().unwrap(),
        vec![Value::String("2020-01-02".to_string())]
    );
}

#[test]
fn test_to_strings_requires_a_format_for_dates() {
    let series = Series::new(vec![Value::String("2020-01-02".to_string())]);
    let dates = series.parse_dates("%Y-%m-%d");

    match dates.to_strings(None).to_values() {
        Err(PipelineError::InvalidArgument(_)) => {},
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_to_strings_formats_plain_values() {
    let series = Series::new(vec![Value::Integer(5), Value::Boolean(true)]);

    assert_eq!(series.to_strings(None).to_values().unwrap(), vec![
        Value::String("5".to_string()),
        Value::String("true".to_string()),
    ]);
}

#[test]
fn test_detect_types_reports_frequencies() {
    let series = Series::new(vec![
        Value::Integer(1),
        Value::String("x".to_string()),
        Value::Integer(2),
        Value::Integer(3),
    ]);

    let report = series.detect_types().unwrap();

    assert_eq!(report.column_names().unwrap(), vec!["Type", "Frequency"]);
    assert_eq!(report.to_rows().unwrap(), vec![
        vec![Value::String("integer".to_string()), Value::Float(75.0)],
        vec![Value::String("string".to_string()), Value::Float(25.0)],
    ]);
}

#[test]
fn test_detect_values_reports_frequencies() {
    let series = Series::new(int_values(&[1, 1, 2, 1]));

    let report = series.detect_values().unwrap();

    assert_eq!(report.to_rows().unwrap(), vec![
        vec![Value::Integer(1), Value::Float(75.0)],
        vec![Value::Integer(2), Value::Float(25.0)],
    ]);
}

#[test]
fn test_bake_is_idempotent() {
    let series = Series::new(int_values(&[1, 2])).select(|value, _| match value {
        Value::Integer(i) => Value::Integer(i * 2),
        other => other.clone(),
    });

    let baked = series.bake().unwrap();
    let twice = baked.bake().unwrap();

    assert_eq!(baked.to_pairs().unwrap(), series.to_pairs().unwrap());
    assert_eq!(twice.to_pairs().unwrap(), baked.to_pairs().unwrap());
}

#[test]
fn test_generator_pipelines_are_single_shot() {
    let series = Series::from_generator(int_values(&[1, 2, 3]).into_iter());

    assert_eq!(series.to_values().unwrap(), int_values(&[1, 2, 3]));

    match series.to_values() {
        Err(PipelineError::InvalidArgument(_)) => {},
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_multi_pass_operations_reject_generator_pipelines() {
    let series = Series::from_generator(int_values(&[1, 2, 3, 4]).into_iter());

    match series.window(2).to_pairs() {
        Err(PipelineError::InvalidArgument(_)) => {},
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_group_sequential_by_key() {
    let series = Series::new(int_values(&[11, 12, 21, 22, 11]));

    let groups = series
        .group_sequential_by(|value| match value {
            Value::Integer(i) => Value::Integer(i / 10),
            other => other.clone(),
        })
        .to_pairs()
        .unwrap();

    assert_eq!(groups.len(), 3);

    match &groups[1].1 {
        Value::Series(members) => {
            assert_eq!(members.to_values().unwrap(), int_values(&[21, 22]));
        },
        other => panic!("unexpected group value: {:?}", other),
    }
}

#[test]
fn test_inflate_series_of_records_into_a_frame() {
    let series = Series::new(vec![
        Value::Record(Record::new().with("a", Value::Integer(1))),
        Value::Record(Record::new().with("a", Value::Integer(2))),
    ]);

    let frame = series.inflate();

    assert_eq!(frame.column_names().unwrap(), vec!["a"]);
    assert_eq!(frame.to_rows().unwrap(), vec![
        vec![Value::Integer(1)],
        vec![Value::Integer(2)],
    ]);
}
