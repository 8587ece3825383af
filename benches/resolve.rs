use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use http::Method;
use restpath::{RequestData, RouteDef, Router, RouterConfig};
use std::hint::black_box;

fn zoo_router() -> Router {
    let routes = [
        ("Root", "/", Some("GET")),
        ("ListAnimals", "/zoo/animals", Some("GET")),
        ("CreateAnimal", "/zoo/animals", Some("POST")),
        ("GetAnimal", "/zoo/animals/{Id}", Some("GET")),
        ("UpdateAnimal", "/zoo/animals/{Id}", Some("PUT,PATCH")),
        ("AnimalToy", "/zoo/animals/{Id}/toys/{ToyId}", Some("GET")),
        (
            "HabitatSection",
            "/zoo/{Category}/animals/{Id}/habitats/{HabitatId}/sections/{SectionId}",
            Some("GET"),
        ),
        ("ArtistInfo", "/music/artists/{MbzGuid}.{ContentType}", Some("GET")),
        ("Files", "/files/{Path*}", None),
        ("Anchored", "/files/{Path*}/meta", Some("GET")),
        ("Health", "/zoo/health", Some("HEAD,OPTIONS")),
    ];
    let mut builder = Router::builder(RouterConfig::default());
    for (name, path, verbs) in routes {
        let mut def = RouteDef::new(path);
        if let Some(verbs) = verbs {
            def = def.verbs(verbs);
        }
        builder = builder.add_dynamic(name, def).expect("valid route");
    }
    builder.build()
}

/// `count` distinct first-literal routes of the same shape.
fn wide_router(count: usize) -> Router {
    let mut builder = Router::builder(RouterConfig::default());
    for i in 0..count {
        builder = builder
            .add_dynamic(
                &format!("Resource{i}"),
                RouteDef::new(format!("/resource{i}/{{Id}}/items/{{ItemId}}")).verbs("GET"),
            )
            .expect("valid route");
    }
    builder.build()
}

fn bench_route_throughput(c: &mut Criterion) {
    let router = zoo_router();
    let test_paths = [
        (Method::GET, "/zoo/animals/123"),
        (Method::GET, "/zoo/animals/123/toys/456"),
        (Method::GET, "/zoo/cats/animals/123/habitats/88/sections/5"),
        (Method::GET, "/music/artists/E0A387F5-48F0-40E0-AAEA-483DD7EE7484.xml"),
        (Method::GET, "/files/a/b/c/meta"),
        (Method::DELETE, "/files/a/b/c"),
    ];
    c.bench_function("route_match", |b| {
        b.iter(|| {
            for (method, path) in &test_paths {
                black_box(router.resolve(method, black_box(path)));
            }
        })
    });

    c.bench_function("route_match_and_hydrate", |b| {
        let data = RequestData::from_query_string("limit=10&offset=20");
        b.iter(|| {
            let matched = router
                .resolve(&Method::GET, black_box("/zoo/animals/123/toys/456"))
                .expect("route matches");
            black_box(router.create_request(&matched, &data))
        })
    });
}

fn bench_table_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_by_table_size");
    for count in [10, 100, 1_000] {
        let router = wide_router(count);
        let path = format!("/resource{}/42/items/7", count / 2);
        group.bench_with_input(BenchmarkId::from_parameter(count), &path, |b, path| {
            b.iter(|| black_box(router.resolve(&Method::GET, black_box(path))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_route_throughput, bench_table_size);
criterion_main!(benches);
