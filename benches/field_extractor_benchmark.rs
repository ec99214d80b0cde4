//! Field extraction throughput over a listing page and a hover fragment

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use url::Url;

use gomunime_scraper_lib::application::listing::{CardFlavor, HoverParser, ListingParser};
use gomunime_scraper_lib::infrastructure::parsing::config::{HoverSelectors, ListingSelectors};
use gomunime_scraper_lib::infrastructure::{ContextualParser, PageDocument};

const LISTING: &str = include_str!("../tests/fixtures/listing.html");
const HOVER: &str = include_str!("../tests/fixtures/hover_frieren.html");

fn listing_cards(c: &mut Criterion) {
    let parser = ListingParser::new(&ListingSelectors::default()).unwrap();
    let url = Url::parse("https://gomunime.co/").unwrap();

    c.bench_function("listing_parse_and_extract", |b| {
        b.iter(|| {
            let page = PageDocument::parse(black_box(LISTING), &url);
            parser.parse_with_context(&page, &CardFlavor::Release)
        });
    });

    let page = PageDocument::parse(LISTING, &url);
    c.bench_function("listing_extract_only", |b| {
        b.iter(|| parser.parse_with_context(black_box(&page), &CardFlavor::Release));
    });
}

fn hover_fragment(c: &mut Criterion) {
    let parser = HoverParser::new(&HoverSelectors::default()).unwrap();
    let url = Url::parse("https://gomunime.co/wp-admin/admin-ajax.php").unwrap();

    c.bench_function("hover_fragment", |b| {
        b.iter(|| parser.parse(&PageDocument::parse_fragment(black_box(HOVER), &url)));
    });
}

criterion_group!(benches, listing_cards, hover_fragment);
criterion_main!(benches);
