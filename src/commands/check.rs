use k8s_openapi::api::apps::v1::ReplicaSet;
use k8s_openapi::api::core::v1::{Node, Pod};
use kube::api::ListParams;
use kube::Api;

use kube_watchdogs::kubeconfig;

pub async fn run(kubeconfig_path: Option<&str>) -> anyhow::Result<()> {
    println!("Running cluster connectivity checks...\n");

    print!("  Kubeconfig .................. ");
    let client = match kubeconfig::build_client(kubeconfig_path).await {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAIL");
            anyhow::bail!("Cannot build Kubernetes client: {}", e);
        }
    };

    print!("  Cluster connection .......... ");
    let version = match client.apiserver_version().await {
        Ok(v) => {
            println!("OK (v{}.{})", v.major, v.minor);
            Some(v)
        }
        Err(e) => {
            println!("FAIL");
            println!("\n  Error: {}", e);
            println!("  Hint:  Is the cluster running? Check with: kubectl cluster-info\n");
            return Ok(());
        }
    };

    print!("  List pods permission ........ ");
    let pods: Api<Pod> = Api::all(client.clone());
    match pods.list(&ListParams::default().limit(1)).await {
        Ok(_) => println!("OK"),
        Err(e) => println!("FAIL ({})", e),
    }

    print!("  List nodes permission ....... ");
    let nodes: Api<Node> = Api::all(client.clone());
    match nodes.list(&ListParams::default()).await {
        Ok(node_list) => println!("OK ({} nodes)", node_list.items.len()),
        Err(e) => println!("FAIL ({})", e),
    }

    print!("  List replicasets permission . ");
    let replicasets: Api<ReplicaSet> = Api::all(client.clone());
    match replicasets.list(&ListParams::default().limit(1)).await {
        Ok(_) => println!("OK"),
        Err(e) => println!("FAIL ({})", e),
    }

    print!("  Delete pods permission ...... ");
    match pods.list(&ListParams::default().limit(1)).await {
        Ok(list) => match list.items.first().and_then(|p| p.metadata.name.clone()) {
            Some(_) => println!("(dry-run only, not attempted)"),
            None => println!("(no pods to test against)"),
        },
        Err(e) => println!("FAIL ({})", e),
    }

    if let Some(v) = version {
        println!("\n  Kubernetes version: {}.{}", v.major, v.minor);
    }

    println!("\nAll checks completed.");
    Ok(())
}
