pub fn execute() -> String {
    [
        "📖 SINPE móvil",
        "",
        "💰 Cuenta",
        "  balance | bal                        Saldo disponible",
        "",
        "📋 Movimientos",
        "  feed [refresh]                       Show the movement list (reload with `refresh`)",
        "  refresh                              Reload from the newest movement",
        "  more                                 Load the next page",
        "  detail <#> | detail <id> <date>      Movement detail by list number or id",
        "",
        "💸 SINPE",
        "  contacts [search]                    Contacts grouped by initial",
        "  send <phone> <amount> <detail...>    Send money, e.g. `send 8753-6347 1,500 almuerzo`",
        "",
        "  quit | exit",
    ]
    .join("\n")
}
