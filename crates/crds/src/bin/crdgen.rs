//! Prints the RuntimeComponent CRD manifest as YAML.
//!
//! Usage: `cargo run -p appstacks-crds --bin crdgen > runtimecomponent-crd.yaml`

use kube::CustomResourceExt;

fn main() -> anyhow::Result<()> {
    let crd = crds::RuntimeComponent::crd();
    print!("{}", serde_yaml::to_string(&crd)?);
    Ok(())
}
