use std::sync::{Arc, Mutex};

use litargs::{
    DefinitionError, Description, ErrorKind, Execution, Litargs, OptionArgs, ParsePiece,
};

fn move_cli(moves: Arc<Mutex<Vec<(String, String, bool)>>>) -> Litargs {
    let mut cli = Litargs::new();
    cli.command(
        "move",
        2,
        Description::new("Move a file").args(["source", "destination"]),
    )
    .expect("move registers")
    .handler(move |args, options| {
        let copy = options.get("cp").is_some_and(OptionArgs::is_set);
        moves
            .lock()
            .unwrap()
            .push((args[0].clone(), args[1].clone(), copy));
        Ok(())
    })
    .expect("handler registers")
    .alias("m")
    .expect("alias registers")
    .option("cp", 0, Description::new("copy"))
    .expect("option registers");
    cli
}

#[test]
fn move_with_copy_flag() {
    let moves = Arc::default();
    let mut cli = move_cli(Arc::clone(&moves));

    let result = cli.parse("move a.txt b.txt --cp").clone();
    assert_eq!(
        result.command,
        Some(ParsePiece::new(
            "move",
            vec!["a.txt".to_string(), "b.txt".to_string()]
        ))
    );
    assert_eq!(result.options, vec![ParsePiece::new("cp", OptionArgs::Flag(true))]);
    assert!(result.errors.is_empty());
    assert!(cli.is_valid());

    assert_eq!(cli.execute_to(&mut std::io::sink()).unwrap(), Execution::Handled);
    assert_eq!(
        moves.lock().unwrap().as_slice(),
        [("a.txt".to_string(), "b.txt".to_string(), true)]
    );
}

#[test]
fn move_with_one_argument_is_padded() {
    let mut cli = move_cli(Arc::default());
    let result = cli.parse("move a.txt");
    assert_eq!(result.positional(), ["a.txt", ""]);
    assert!(result.errors.is_empty());
}

#[test]
fn unknown_command_renders_help_instead_of_running() {
    let moves = Arc::default();
    let mut cli = move_cli(Arc::clone(&moves));
    let result = cli.parse("nosuch x");
    assert!(result.command.is_none());
    assert!(result.options.is_empty());
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, ErrorKind::ReferenceError);
    assert!(!cli.is_valid());

    let mut out: Vec<u8> = Vec::new();
    assert_eq!(cli.execute_to(&mut out).unwrap(), Execution::Help);
    let help = String::from_utf8(out).unwrap();
    assert!(help.contains("No defined command 'nosuch'"));
    assert!(moves.lock().unwrap().is_empty());
}

#[test]
fn empty_input_is_distinguished_from_unknown_name() {
    let mut cli = move_cli(Arc::default());
    let blank = cli.parse("").errors[0].detail.clone();
    let unknown = cli.parse("zzz").errors[0].detail.clone();
    assert_eq!(blank, "Nothing specified");
    assert_eq!(unknown, "No defined command 'zzz'");
}

#[test]
fn positional_length_always_matches_arity() {
    let mut cli = Litargs::new();
    cli.command("three", 3, Description::new("three slots")).unwrap();

    for k in 0..=3 {
        let supplied: Vec<String> = (0..k).map(|i| format!("v{i}")).collect();
        let line = format!("three {}", supplied.join(" "));
        let result = cli.parse(&line);
        assert!(result.is_valid(), "{line}");
        let positional = result.positional();
        assert_eq!(positional.len(), 3);
        assert_eq!(&positional[..k], supplied.as_slice());
        assert!(positional[k..].iter().all(String::is_empty));
    }

    let result = cli.parse("three a b c d e");
    assert_eq!(result.positional(), ["a", "b", "c"]);
    assert_eq!(result.errors_of(ErrorKind::ArgumentError).count(), 1);
}

#[test]
fn alias_dispatches_to_the_same_handler() {
    let moves = Arc::default();
    let mut cli = move_cli(Arc::clone(&moves));
    cli.parse("m x y");
    cli.execute_to(&mut std::io::sink()).unwrap();
    assert_eq!(
        moves.lock().unwrap().as_slice(),
        [("x".to_string(), "y".to_string(), false)]
    );
}

#[test]
fn duplicate_registration_leaves_registry_untouched() {
    let mut cli = move_cli(Arc::default());
    let err = cli
        .command("move", 0, Description::new("other"))
        .unwrap_err();
    assert_eq!(err, DefinitionError::DuplicateCommand("move".to_string()));
    assert_eq!(cli.registry().get("move").unwrap().arity(), 2);
    assert!(!cli.help().contains("other"));
}

#[test]
fn help_lists_aliased_command_once() {
    let mut cli = move_cli(Arc::default());
    cli.parse("help");
    let help = cli.help();
    assert_eq!(help.matches("Move a file").count(), 1);
    assert!(help.contains("\tAliases: m\n"));
    assert!(help.contains("\t\t--cp\t\tcopy\n"));
}
