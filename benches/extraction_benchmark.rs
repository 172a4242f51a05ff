//! Extraction throughput on a synthetic listing page
//!
//! Compares the full HTML path (tree building + event replay) against
//! replaying an already tokenized event stream.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use catalog_extractor::ProductListParser;
use catalog_extractor::infrastructure::parsing::MarkupEvent;

const PRODUCTS_PER_PAGE: usize = 24;

fn synthetic_page() -> String {
    let cards: String = (0..PRODUCTS_PER_PAGE)
        .map(|i| {
            format!(
                r#"<li><div class="jum-item jum-item-product" data-jum-product-sku="{i:06}STK">
                     <figure class="jum-item-figure"><img data-jum-hr-src="/dam/{i}.png"></figure>
                     <div class="jum-item-titlewrap"><h3>Product {i}</h3></div>
                     <div class="jum-item-badges"><img alt="2 voor 3,50"></div>
                     <div class="jum-promotion-date">Geldig van 3-6 t/m 9-6</div>
                     <span class="jum-price-format">{}.{:02}</span>
                     <span class="jum-pack-size">{} gram</span>
                   </div></li>"#,
                i + 1,
                i % 100,
                (i + 1) * 50
            )
        })
        .collect();
    format!("<html><body><ul>{cards}</ul></body></html>")
}

fn synthetic_events() -> Vec<MarkupEvent> {
    let mut events = Vec::new();
    for i in 0..PRODUCTS_PER_PAGE {
        let sku = format!("{i:06}STK");
        events.push(MarkupEvent::open(
            "div",
            [("class", "jum-item-product"), ("data-jum-product-sku", sku.as_str())],
        ));
        events.push(MarkupEvent::open("span", [("class", "jum-price-format")]));
        events.push(MarkupEvent::characters("1.19"));
        events.push(MarkupEvent::Close);
        events.push(MarkupEvent::open("span", [("class", "jum-pack-size")]));
        events.push(MarkupEvent::characters("500 gram"));
        events.push(MarkupEvent::Close);
        events.push(MarkupEvent::Close);
    }
    events
}

fn benchmark_extraction(c: &mut Criterion) {
    let parser = ProductListParser::new();
    let html = synthetic_page();
    let events = synthetic_events();

    c.bench_function("parse_html_listing_page", |b| {
        b.iter(|| {
            let mut count = 0usize;
            parser.parse_html(black_box(&html), |_| count += 1);
            count
        });
    });

    c.bench_function("replay_event_stream", |b| {
        b.iter(|| {
            let mut count = 0usize;
            parser.parse(black_box(events.as_slice()), |_| count += 1);
            count
        });
    });
}

criterion_group!(benches, benchmark_extraction);
criterion_main!(benches);
