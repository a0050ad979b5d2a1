use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mediaminer_core::guess::IdentityGuesser;

fn bench_guess(c: &mut Criterion) {
    let guesser = IdentityGuesser::new().unwrap();

    let inputs = vec![
        "Show.Name.S01E02.Title.mkv",
        "Inception.2010.mkv",
        "The Office 2x01 The Dundies (720p).avi",
        "Blade Runner 1982 Final Cut [BluRay].mkv",
        "1984.Movie.mp4",
    ];

    c.bench_function("guess_single", |b| {
        b.iter(|| guesser.guess_filename(black_box(inputs[0])));
    });

    c.bench_function("guess_batch_5", |b| {
        b.iter(|| {
            for input in &inputs {
                let _ = guesser.guess_filename(black_box(input));
            }
        });
    });
}

criterion_group!(benches, bench_guess);
criterion_main!(benches);
