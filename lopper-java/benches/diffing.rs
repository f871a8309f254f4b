use divan::{Bencher, black_box};
use lopper::{BuildConfig, DiffConfig};

fn main() {
    divan::main();
}

/// A class with `methods` small methods.
fn generate_class(methods: usize) -> String {
    let mut source = String::from("public class Generated {\n");
    for i in 0..methods {
        source.push_str(&format!(
            "    int m{i}(int a) {{\n        int b = a * {i};\n        return b + {i};\n    }}\n\n"
        ));
    }
    source.push_str("}\n");
    source
}

/// Change one literal in the middle of the class.
fn modify_class(source: &str, methods: usize) -> String {
    let mid = methods / 2;
    source.replacen(&format!("return b + {mid};"), "return b + 1000;", 1)
}

#[divan::bench(args = [10, 100, 1000])]
fn build_tree(bencher: Bencher, methods: usize) {
    let source = generate_class(methods);
    bencher.bench_local(|| {
        let tree = lopper_java::build_tree(black_box(&source), &BuildConfig::default()).unwrap();
        black_box(tree);
    });
}

#[divan::bench(args = [10, 100, 1000])]
fn diff_one_change(bencher: Bencher, methods: usize) {
    let old = generate_class(methods);
    let new = modify_class(&old, methods);
    bencher.bench_local(|| {
        let diff =
            lopper_java::diff_sources(black_box(&old), black_box(&new), &DiffConfig::default())
                .unwrap();
        black_box(diff);
    });
}

#[divan::bench(args = [10, 100])]
fn diff_batch(bencher: Bencher, methods: usize) {
    let old = generate_class(methods);
    let new = modify_class(&old, methods);
    let pairs: Vec<(String, String)> = (0..16).map(|_| (old.clone(), new.clone())).collect();
    bencher.bench_local(|| {
        let results = lopper_java::diff_batch(black_box(&pairs), &DiffConfig::default());
        black_box(results);
    });
}
