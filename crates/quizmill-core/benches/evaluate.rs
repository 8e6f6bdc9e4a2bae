use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizmill_core::evaluator::evaluate;
use quizmill_core::model::{AnswerOption, DragItem, Question, QuestionBody};
use quizmill_core::response::ResponseValue;
use std::collections::BTreeMap;

fn option(id: usize) -> AnswerOption {
    AnswerOption {
        id: format!("opt_{id}"),
        text: Some(format!("Option {id}")),
        image: None,
    }
}

fn question(body: QuestionBody) -> Question {
    Question {
        id: "bench".into(),
        ordinal: 1,
        prompt: "bench".into(),
        body,
        max_points: 10,
        penalty_points: 0,
        time_budget_ms: None,
        explanation: None,
        show_solution: false,
    }
}

fn bench_choice(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_choice");

    let single = question(QuestionBody::SingleChoice {
        options: (1..=4).map(option).collect(),
        solution: vec!["opt_3".into()],
    });
    let response = ResponseValue::Selected {
        option_id: "opt_3".into(),
    };
    group.bench_function("single_choice", |b| {
        b.iter(|| evaluate(black_box(&single), black_box(&response)))
    });

    let multi = question(QuestionBody::MultiChoice {
        options: (1..=16).map(option).collect(),
        solution: (1..=8).map(|i| format!("opt_{i}")).collect(),
    });
    let response = ResponseValue::SelectedMany {
        option_ids: (1..=8).rev().map(|i| format!("opt_{i}")).collect(),
    };
    group.bench_function("multi_choice_16_options", |b| {
        b.iter(|| evaluate(black_box(&multi), black_box(&response)))
    });

    group.finish();
}

fn bench_ordering(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_ordering");

    for n in [4usize, 16, 64] {
        let q = question(QuestionBody::Ordering {
            options: (1..=n).map(option).collect(),
            solution: (1..=n).map(|i| format!("opt_{i}")).collect(),
        });
        let response = ResponseValue::Arrangement {
            option_ids: (1..=n).map(|i| format!("opt_{i}")).collect(),
        };
        group.bench_function(format!("n={n}"), |b| {
            b.iter(|| evaluate(black_box(&q), black_box(&response)))
        });
    }

    group.finish();
}

fn bench_placement(c: &mut Criterion) {
    let q = question(QuestionBody::Placement {
        items: (1..=8)
            .map(|i| DragItem {
                id: format!("i{i}"),
                label: None,
                image: None,
                zone: if i % 2 == 0 { "safe" } else { "danger" }.into(),
            })
            .collect(),
        zones: vec!["danger".into(), "safe".into()],
    });
    let placements: BTreeMap<String, String> = (1..=8)
        .map(|i| {
            (
                format!("i{i}"),
                if i % 2 == 0 { "safe" } else { "danger" }.to_string(),
            )
        })
        .collect();
    let response = ResponseValue::Placements { placements };

    c.bench_function("evaluate_placement_8_items", |b| {
        b.iter(|| evaluate(black_box(&q), black_box(&response)))
    });
}

criterion_group!(benches, bench_choice, bench_ordering, bench_placement);
criterion_main!(benches);
