use jsonrpc_yet::id::{Decimal, Hexadecimal, Random, Uuid};
use jsonrpc_yet::{args, Notification, Request, Result};

fn main() -> Result<()> {
    let ids = Decimal::default();
    println!("{}", Request::new("ping", args![], &ids));
    println!("{}", Request::new("add", args![2, 3], &ids));
    println!("{}", Request::new("cat", args!(; name = "Yoko", age = 5), &ids));
    println!("{}", Notification::new("find", args!("Foo"; age = 42)));

    println!("{}", Request::new("ping", args![], &Hexadecimal::new(255)));
    println!("{}", Request::new("ping", args![], &Random::default()));
    println!("{}", Request::new("ping", args![], &Uuid));
    Ok(())
}
