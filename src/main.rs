// Interactive prompt over a single database file.

use std::io::{self, BufRead, Write};
use std::process;

use udb::node;
use udb::row::ROW_SIZE;
use udb::statement::{self, Statement};
use udb::{Result, Table};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let Some(path) = args.get(1) else {
        println!("Must supply a database filename.");
        process::exit(1);
    };

    let mut table = match Table::open(path) {
        Ok(table) => table,
        Err(e) => {
            println!("Error: {e}");
            process::exit(1);
        }
    };

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("db > ");
        let _ = io::stdout().flush();

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => {
                // EOF: persist and leave quietly
                exit_on_error(table.close());
                return;
            }
            Ok(_) => {}
            Err(e) => {
                println!("Error: {e}");
                process::exit(1);
            }
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if input == ".exit" {
            exit_on_error(table.close());
            println!("Bye!");
            return;
        }
        if input.starts_with('.') {
            do_meta_command(input, &mut table);
            continue;
        }

        match statement::prepare(input) {
            Ok(stmt) => execute_statement(stmt, &mut table),
            Err(e) => println!("{e}"),
        }
    }
}

fn execute_statement(stmt: Statement, table: &mut Table) {
    let result = match stmt {
        Statement::Insert(row) => table.insert(&row),
        Statement::Select => execute_select(table),
        Statement::Delete(id) => table.delete(id),
    };
    match result {
        Ok(()) => println!("Executed."),
        Err(e) if e.is_recoverable() => println!("Error: {e}"),
        Err(e) => {
            println!("Error: {e}");
            process::exit(1);
        }
    }
}

fn execute_select(table: &mut Table) -> Result<()> {
    let mut cursor = table.start()?;
    while !cursor.end_of_table {
        let row = table.cursor_row(&cursor)?;
        println!("({}, {}, {})", row.id, row.username, row.email);
        table.advance(&mut cursor)?;
    }
    Ok(())
}

fn do_meta_command(input: &str, table: &mut Table) {
    match input {
        ".btree" => {
            println!("Tree:");
            let mut out = io::stdout().lock();
            if let Err(e) = table.print_tree(&mut out) {
                drop(out);
                println!("Error: {e}");
                process::exit(1);
            }
        }
        ".constants" => {
            println!("Constants:");
            print_constants();
        }
        _ => println!("Unrecognized command '{input}'"),
    }
}

fn print_constants() {
    println!("ROW_SIZE: {}", ROW_SIZE);
    println!("COMMON_NODE_HEADER_SIZE: {}", node::COMMON_NODE_HEADER_SIZE);
    println!("LEAF_NODE_HEADER_SIZE: {}", node::LEAF_NODE_HEADER_SIZE);
    println!("LEAF_NODE_CELL_SIZE: {}", node::LEAF_NODE_CELL_SIZE);
    println!(
        "LEAF_NODE_SPACE_FOR_CELLS: {}",
        node::LEAF_NODE_SPACE_FOR_CELLS
    );
    println!("LEAF_NODE_MAX_CELLS: {}", node::LEAF_NODE_MAX_CELLS);
    println!(
        "INTERNAL_NODE_HEADER_SIZE: {}",
        node::INTERNAL_NODE_HEADER_SIZE
    );
    println!("INTERNAL_NODE_CELL_SIZE: {}", node::INTERNAL_NODE_CELL_SIZE);
    println!(
        "INTERNAL_NODE_MAX_CELLS: {}",
        node::INTERNAL_NODE_MAX_CELLS
    );
}

fn exit_on_error(result: Result<()>) {
    if let Err(e) = result {
        println!("Error: {e}");
        process::exit(1);
    }
}
