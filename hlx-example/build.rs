fn main() {
    println!("cargo:rerun-if-changed=schema.yaml");
    let out_dir = std::env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    hlx_codegen::generate_from_schema("schema.yaml", &format!("{out_dir}/generated.rs"))
        .expect("Failed to generate index records from schema.yaml");
}
