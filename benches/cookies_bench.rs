use criterion::{black_box, criterion_group, criterion_main, Criterion};
use scratchnet::cookies::monster::CookieMonster;
use url::Url;

fn benchmark_cookie_insert(c: &mut Criterion) {
    let store = CookieMonster::new();
    let url = Url::parse("https://scratch.mit.edu/csrf_token/").unwrap();

    c.bench_function("cookie_parse_and_save", |b| {
        b.iter(|| {
            let _ = store.parse_and_save_cookie(
                black_box(&url),
                black_box("scratchcsrftoken=abc123; Path=/; SameSite=Lax"),
            );
        })
    });
}

fn benchmark_cookie_get(c: &mut Criterion) {
    let store = CookieMonster::new();
    let url = Url::parse("https://scratch.mit.edu/site-api/comments/user/bob/add/").unwrap();
    // 40 cookies stays under the per-domain cap.
    for i in 0..40 {
        let _ = store.parse_and_save_cookie(&url, &format!("cookie{}=val; Path=/site-api", i));
    }

    c.bench_function("cookie_get_for_url", |b| {
        b.iter(|| {
            black_box(store.get_cookies_for_url(black_box(&url)));
        })
    });

    c.bench_function("cookie_header_for_url", |b| {
        b.iter(|| {
            black_box(store.cookie_header_for_url(black_box(&url)));
        })
    });

    c.bench_function("cookie_get_by_name", |b| {
        b.iter(|| {
            black_box(store.get_cookie(black_box("scratch.mit.edu"), black_box("cookie39")));
        })
    });
}

criterion_group!(benches, benchmark_cookie_insert, benchmark_cookie_get);
criterion_main!(benches);
