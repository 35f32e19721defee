//! Benchmarks for tokenizing, paste and batch processing
//!
//! Run with: cargo bench tokenize

use chipsinput::tokenizer::{AddressTokenizer, Tokenizer};
use chipsinput::{ChipsConfig, ChipsField};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

fn addresses(count: usize) -> String {
    (0..count)
        .map(|i| format!("user{}@example.com", i))
        .collect::<Vec<_>>()
        .join(", ")
}

fn sized_field() -> ChipsField {
    let mut field = ChipsField::new(ChipsConfig::default()).unwrap();
    field.set_width(400);
    field.set_focus(true);
    field
}

// ============================================================================
// Tokenizer
// ============================================================================

#[divan::bench(args = [10, 50, 200])]
fn find_token_start_at_end(bencher: divan::Bencher, count: usize) {
    let text = addresses(count);
    let end = text.chars().count();
    let tokenizer = AddressTokenizer::new();
    bencher.bench(|| tokenizer.find_token_start(divan::black_box(&text), end));
}

#[divan::bench]
fn find_token_end_quoted() {
    let text = "\"Doe, John\" <john@example.com> (work, main), next@example.com";
    AddressTokenizer::new().find_token_end(divan::black_box(text), 0);
}

// ============================================================================
// Field operations
// ============================================================================

#[divan::bench(args = [5, 20, 45])]
fn paste_addresses(bencher: divan::Bencher, count: usize) {
    let text = format!("{};", addresses(count));
    bencher
        .with_inputs(sized_field)
        .bench_local_values(|mut field| {
            field.paste(divan::black_box(&text));
            field
        });
}

#[divan::bench(args = [10, 50])]
fn pending_batch(bencher: divan::Bencher, count: usize) {
    bencher
        .with_inputs(|| {
            let mut field = sized_field();
            for i in 0..count {
                field.append(&format!("user{}@example.com", i));
            }
            field
        })
        .bench_local_values(|mut field| {
            field.run_tasks();
            field
        });
}

#[divan::bench]
fn type_ten_addresses() {
    let mut field = sized_field();
    for i in 0..10 {
        for ch in format!("user{}@example.com,", i).chars() {
            field.type_char(ch);
        }
    }
    divan::black_box(field.chip_count());
}
