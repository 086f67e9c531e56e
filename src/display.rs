//! Terminal output for query results

use plasma_cli::crypto::Account;
use plasma_cli::exit::StartedExit;
use plasma_cli::utxo::{currency_label, Balance, Utxo};
use plasma_cli::watcher::{ExitData, SubmitReceipt, WatcherStatus};

pub fn utxos(utxos: &[Utxo]) {
    if utxos.is_empty() {
        println!("No UTXOs found");
        return;
    }
    println!(
        "{:<20} {:>10} {:>8} {:>6} {:>24}  {}",
        "UTXO POSITION", "BLOCK", "TX", "OUT", "AMOUNT", "CURRENCY"
    );
    for utxo in utxos {
        println!(
            "{:<20} {:>10} {:>8} {:>6} {:>24}  {}",
            utxo.utxo_pos,
            utxo.blknum,
            utxo.txindex,
            utxo.oindex,
            utxo.amount,
            currency_label(&utxo.currency)
        );
    }
}

pub fn balance(balances: &[Balance]) {
    if balances.is_empty() {
        println!("No balance");
        return;
    }
    for entry in balances {
        println!("{:>24}  {}", entry.amount, currency_label(&entry.currency));
    }
}

pub fn status(status: &WatcherStatus) {
    println!("Last validated child block: {}", status.last_validated_child_block_number);
    println!("Last mined child block:     {}", status.last_mined_child_block_number);
    println!("Last mined block timestamp: {}", status.last_mined_child_block_timestamp);
    println!("Ethereum syncing:           {}", status.eth_syncing);
    println!("Byzantine events:           {}", status.byzantine_events.len());
    for event in &status.byzantine_events {
        println!("  {}", event);
    }
}

pub fn exit_data(data: &ExitData) {
    println!("UTXO position: {}", data.utxo_pos);
    println!("Transaction:   0x{}", hex::encode(&data.txbytes));
    println!("Proof:         0x{}", hex::encode(&data.proof));
}

pub fn receipt(receipt: &SubmitReceipt) {
    println!("Transaction {:?}", receipt.txhash);
    println!("Block {} index {}", receipt.blknum, receipt.txindex);
    for position in &receipt.created {
        println!("  new UTXO {}", position);
    }
}

pub fn started_exit(exit: &StartedExit) {
    println!("Exit of UTXO {} started in {:?}", exit.utxo_pos, exit.tx_hash);
}

pub fn account(account: &Account) {
    println!("Address:     {:?}", account.address);
    println!("Private key: {}", account.private_key_hex());
}
