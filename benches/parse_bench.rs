use criterion::{black_box, criterion_group, criterion_main, Criterion};
use plexmv::parser::FilenameParser;

const EPISODE: &str = "Marvels.Agents.of.S.H.I.E.L.D.S02E01.Shadows.1080p.WEB-DL.DD5.1.H.264-ECI";
const MOVIE: &str = "Night.Of.The.Living.Dead.1968.REMASTERED.1080p.BluRay.x265-RARBG";
const MESSY: &str = "www.Torrenting.com   -    Anatomy.Of.A.Fall.2023.1080p.WEBRip.x264.AAC5.1";

fn bench_parse_episode(c: &mut Criterion) {
    let parser = FilenameParser::new().unwrap();

    c.bench_function("parse_episode", |b| {
        b.iter(|| {
            let record = parser.parse(black_box(EPISODE));
            black_box(record);
        })
    });
}

fn bench_parse_movie(c: &mut Criterion) {
    let parser = FilenameParser::new().unwrap();

    c.bench_function("parse_movie", |b| {
        b.iter(|| {
            let record = parser.parse(black_box(MOVIE));
            black_box(record);
        })
    });
}

fn bench_parse_with_site_prefix(c: &mut Criterion) {
    let parser = FilenameParser::new().unwrap();

    c.bench_function("parse_with_site_prefix", |b| {
        b.iter(|| {
            let record = parser.parse(black_box(MESSY));
            black_box(record);
        })
    });
}

fn bench_parser_construction(c: &mut Criterion) {
    c.bench_function("parser_construction", |b| {
        b.iter(|| {
            let parser = FilenameParser::new().unwrap();
            black_box(parser);
        })
    });
}

criterion_group!(
    benches,
    bench_parse_episode,
    bench_parse_movie,
    bench_parse_with_site_prefix,
    bench_parser_construction
);
criterion_main!(benches);
