// Copyright 2026 Boundless Foundation, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use alloy::{
    primitives::{Address, U256},
    sol_types::SolValue,
};
use task_explorer::{
    contracts::ClassificationNotice,
    decode::{Decoded, TaskInput},
    render::render,
    test_utils::{sample_deployment, MockChainClient},
    Explorer, InputDetails, Screen,
};
use tracing_test::traced_test;

const ALICE: &str = "0xA1a1A1a1a1a1a1A1a1a1a1a1a1a1a1a1A1a1a1A1";

fn notice(result: u64, theme: &str) -> Vec<u8> {
    ClassificationNotice {
        result: U256::from(result),
        theme: theme.into(),
        classes: vec!["cat".into(), "dog".into()],
        probabilities: vec![U256::from(70), U256::from(30)],
    }
    .abi_encode_params()
}

#[tokio::test]
#[traced_test]
async fn search_select_and_return() {
    colored::control::set_override(false);
    let deployment = sample_deployment(1_000, 249);
    let alice = Address::repeat_byte(0xa1);
    let bob = Address::repeat_byte(0xb0);
    let alice_input = TaskInput { image: String::new(), theme: "pets".into() };
    let bob_input = TaskInput { image: String::new(), theme: "cars".into() };

    let client = MockChainClient::new(2_000)
        .with_task(&deployment, 1_100, &alice_input, alice)
        .with_task(&deployment, 1_400, &bob_input, bob);
    let alice_payload = alloy::primitives::keccak256(alice_input.encode().unwrap());
    let bob_payload = alloy::primitives::keccak256(bob_input.encode().unwrap());
    let client = client
        .with_notice(&deployment, 1_150, alice_payload, alice, notice(91, "pets"))
        .with_notice(&deployment, 1_900, bob_payload, bob, notice(12, "cars"));

    let mut explorer = Explorer::new(client, deployment);
    let tasks = explorer.search(ALICE).await.unwrap();
    assert_eq!(tasks.len(), 1);
    let task = tasks[0].clone();
    assert_eq!(task.payload_hash(), alice_payload);

    explorer.select(0).await.unwrap();
    assert_eq!(
        explorer.screen(),
        &Screen::Detail {
            payload_hash: alice_payload,
            input: Some(InputDetails { hash: task.transaction_hash, block_number: 1_100 }),
        }
    );
    assert_eq!(explorer.notices().len(), 1);
    match explorer.notices()[0].decode() {
        Decoded::Value(result) => {
            assert_eq!(result.result, U256::from(91));
            assert_eq!(result.predictions.len(), 2);
        }
        Decoded::Undecodable => panic!("notice should decode"),
    }

    let detail = render(&explorer);
    assert!(detail.contains(&format!("{:#x}", task.transaction_hash)));
    assert!(detail.contains("1100"));
    assert!(detail.contains("cat"));

    // [1000, 2000] in spans of 250 blocks.
    assert_eq!(explorer.client().notice_ranges().len(), 5);

    explorer.back();
    assert_eq!(explorer.screen(), &Screen::Listing);
    assert_eq!(explorer.tasks().unwrap(), &[task]);
    assert!(render(&explorer).contains("pets"));
}

#[tokio::test]
async fn unmatched_account_lists_nothing() {
    colored::control::set_override(false);
    let deployment = sample_deployment(0, 10_000);
    let client = MockChainClient::new(50).with_task(
        &deployment,
        10,
        &TaskInput { image: String::new(), theme: "x".into() },
        Address::repeat_byte(0xa1),
    );
    let mut explorer = Explorer::new(client, deployment);

    let tasks = explorer.search("0xABCD000000000000000000000000000000001234").await.unwrap();

    assert!(tasks.is_empty());
    assert!(explorer.no_tasks_found());
    assert!(explorer.listing_status().error().is_none());
    assert!(render(&explorer).contains("No tasks found"));
}
